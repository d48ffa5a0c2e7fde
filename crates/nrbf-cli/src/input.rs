use std::fs;
use std::io::{self, Read as _};

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use nrbf_decoder::DecoderOptions;

use crate::InputArgs;

impl InputArgs {
    /// Human-readable name of the input, for error context.
    pub fn name(&self) -> String {
        match &self.file {
            Some(path) if path.as_os_str() != "-" => path.display().to_string(),
            _ => "<stdin>".to_string(),
        }
    }

    /// Read the whole input, decoding base64 when asked.
    ///
    /// Whitespace inside base64 text is ignored so wrapped output from
    /// other tools can be piped in as is.
    pub fn read(&self) -> Result<Vec<u8>> {
        let raw = match &self.file {
            Some(path) if path.as_os_str() != "-" => {
                fs::read(path).with_context(|| format!("cannot read {}", path.display()))?
            }
            _ => {
                let mut buf = Vec::new();
                io::stdin()
                    .read_to_end(&mut buf)
                    .context("cannot read stdin")?;
                buf
            }
        };

        if !self.base64 {
            return Ok(raw);
        }
        let text: Vec<u8> = raw
            .into_iter()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        STANDARD
            .decode(text)
            .with_context(|| format!("{} is not valid base64", self.name()))
    }

    pub fn decoder_options(&self) -> DecoderOptions {
        if self.no_limit {
            DecoderOptions::default().with_max_length(None)
        } else {
            DecoderOptions::default()
        }
    }
}
