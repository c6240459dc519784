//! Command implementations.

use std::io::Read;

use anyhow::Context;
use camino::Utf8Path;
use owo_colors::{OwoColorize, Stream, Style};
use zhi_lang_cop_core::{Config, TermDictionary};

pub mod build;
pub mod check;
pub mod info;
pub mod lookup;
pub mod rules;
#[cfg(feature = "mcp")]
pub mod serve;
pub mod stats;

/// Render `text` in `style` when stdout supports color.
///
/// `--color always|never` overrides detection via [`crate::ColorChoice::apply`].
pub fn paint(text: impl std::fmt::Display, style: Style) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.style(style))
        .to_string()
}

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    std::fs::read_to_string(path.as_std_path()).with_context(|| format!("failed to read {path}"))
}

/// Read all of stdin, stopping with an error once it exceeds the limit.
pub fn read_stdin(max_bytes: Option<usize>) -> anyhow::Result<String> {
    let mut buf = String::new();
    match max_bytes {
        Some(max) => {
            let limit = u64::try_from(max).unwrap_or(u64::MAX).saturating_add(1);
            std::io::stdin()
                .lock()
                .take(limit)
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            if buf.len() > max {
                anyhow::bail!("input too large: stdin exceeds {max} bytes");
            }
        }
        None => {
            std::io::stdin()
                .lock()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
        }
    }
    Ok(buf)
}

/// Load the configured dictionary, or the bundled one.
pub fn load_dictionary(config: &Config) -> anyhow::Result<TermDictionary> {
    let path = config.dictionary.as_deref();
    let dict = TermDictionary::load_or_bundled(path).with_context(|| match path {
        Some(p) => format!("failed to load dictionary {p}"),
        None => "failed to load bundled dictionary".to_string(),
    })?;
    tracing::debug!(
        version = dict.version(),
        path = ?path,
        "dictionary loaded"
    );
    Ok(dict)
}
