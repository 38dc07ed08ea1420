pub use anyhow::{Context as _, Result as Fallible, bail, ensure};
pub use tracing::{debug, error, info, trace, warn};

#[derive(Default)]
pub struct TomlLoader {
    buf: String,
}

impl TomlLoader {
    pub fn new() -> Self {
        Default::default()
    }

    /// Loads `path` as `T`. A missing file is treated as an empty document so that every
    /// `#[serde(default)]` field falls back to its default.
    pub fn load_or_default<T>(&mut self, path: &std::path::Path) -> Fallible<T>
    where
        T: serde::de::DeserializeOwned,
    {
        use std::io::Read;

        self.buf.clear();
        if path.exists() {
            std::io::BufReader::new(
                std::fs::File::open(path).with_context(|| format!("open {}", path.display()))?,
            )
            .read_to_string(&mut self.buf)?;
        }
        toml::from_str(&self.buf).with_context(|| format!("parse {}", path.display()))
    }
}

/// Human readable byte size, `12.34 KB` style.
pub struct SizeFormat(pub u64);

impl std::fmt::Display for SizeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const KIB: f64 = 1024.0;
        let size = self.0 as f64;
        if size < KIB * KIB {
            write!(f, "{:.2} KB", size / KIB)
        } else {
            write!(f, "{:.2} MB", size / (KIB * KIB))
        }
    }
}
