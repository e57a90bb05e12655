//! TrueType font registration for bitmap output.
//!
//! The SVG backend writes text as `<text>` elements and needs no font data. The
//! bitmap backend rasterizes glyphs itself, so a font must be registered under
//! the `sans-serif` family before the first PNG is drawn.

use anyhow::{Context, Result, anyhow};
use plotters::style::{FontStyle, register_font};
use std::path::Path;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

static REGISTERED: AtomicBool = AtomicBool::new(false);

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load a `.ttf`/`.otf` file and use it for all bitmap chart text.
pub fn register_font_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    // plotters keeps a reference to the font data for the rest of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font("sans-serif", FontStyle::Normal, bytes)
        .map_err(|_| anyhow!("{} is not a usable TrueType/OpenType font", path.display()))?;
    REGISTERED.store(true, Ordering::SeqCst);
    log::debug!("registered chart font {}", path.display());
    Ok(())
}

/// True once a font is available, probing common system locations on first use.
pub fn ensure_font() -> bool {
    if REGISTERED.load(Ordering::SeqCst) {
        return true;
    }
    static PROBED: OnceLock<bool> = OnceLock::new();
    *PROBED.get_or_init(|| {
        SYSTEM_FONTS
            .iter()
            .map(Path::new)
            .filter(|p| p.is_file())
            .any(|p| register_font_file(p).is_ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_file_is_an_error() {
        let err = register_font_file("/definitely/not/here.ttf").unwrap_err();
        assert!(err.to_string().contains("reading font"));
    }

    #[test]
    fn garbage_font_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("bad.ttf");
        std::fs::write(&p, b"not a font").unwrap();
        let err = register_font_file(&p).unwrap_err();
        assert!(err.to_string().contains("not a usable"));
    }
}
