use crate::model::PlanningData;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge le jeu de données depuis un support.
    fn load(&self) -> anyhow::Result<PlanningData>;
    /// Sauvegarde de manière atomique.
    fn save(&self, data: &PlanningData) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Jeu de données du fichier, ou vide si le fichier n'existe pas encore.
    pub fn load_or_default(&self) -> anyhow::Result<PlanningData> {
        if self.path.exists() {
            self.load()
        } else {
            Ok(PlanningData::default())
        }
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<PlanningData> {
        let bytes =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let data: PlanningData =
            serde_json::from_slice(&bytes).with_context(|| "parsing planning data")?;
        Ok(data)
    }

    fn save(&self, data: &PlanningData) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(data)?;
        // parent() rend "" pour un chemin relatif nu
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
