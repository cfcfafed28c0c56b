//! Site data → pretty-printed JSON.

use crate::site::SiteBuilder;
use anyhow::{Context, Result};
use std::io::Write;

/// Serialize everything `builder` holds (two-space indent) and write it with
/// a trailing newline.
pub fn emit_site<B: SiteBuilder, W: Write>(builder: &B, mut out: W) -> Result<()> {
    let json = serde_json::to_string_pretty(builder.site())
        .context("failed to serialize site data")?;
    writeln!(out, "{json}").context("failed to write site data")?;
    out.flush().context("failed to write site data")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::site::SiteDataBuilder;

    #[test]
    fn test_emit_empty_site() {
        let mut out = Vec::new();
        emit_site(&SiteDataBuilder::new(&SiteConfig::default()), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\n  \"guests\": [],\n  \"pages\": [],\n  \"pagePaths\": [],\n  \"posts\": []\n}\n"
        );
    }
}
