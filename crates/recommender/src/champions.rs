use crate::error::ChampionSourceError;
use core_types::Champion;
use std::fs;
use std::path::PathBuf;

/// A repository of best-known strategy configurations.
///
/// Returns a `Result` so callers decide explicitly how to degrade when the
/// repository is unreachable; the recommender logs and continues without
/// enrichment.
pub trait ChampionSource {
    /// Champions with a Sharpe ratio of at least `min_sharpe`.
    fn champions(&self, min_sharpe: f64) -> Result<Vec<Champion>, ChampionSourceError>;
}

/// A champion repository backed by a JSON file: an array of champion objects.
///
/// A missing file is an empty repository, not an error; only an unreadable
/// or malformed file fails.
pub struct JsonChampionFile {
    path: PathBuf,
}

impl JsonChampionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ChampionSource for JsonChampionFile {
    fn champions(&self, min_sharpe: f64) -> Result<Vec<Champion>, ChampionSourceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ChampionSourceError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let all: Vec<Champion> =
            serde_json::from_str(&raw).map_err(|source| ChampionSourceError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        Ok(all
            .into_iter()
            .filter(|c| c.sharpe_ratio >= min_sharpe)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::TemplateId;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_an_empty_repository() {
        let dir = TempDir::new().unwrap();
        let source = JsonChampionFile::new(dir.path().join("champions.json"));
        assert!(source.champions(1.5).unwrap().is_empty());
    }

    #[test]
    fn champions_below_the_bar_are_filtered_out() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("champions.json");
        let champions = vec![
            Champion {
                genome_id: "g-1".into(),
                template_name: TemplateId::MomentumRanker,
                sharpe_ratio: 2.1,
                parameters: BTreeMap::from([("stock_count".to_string(), 20.0)]),
            },
            Champion {
                genome_id: "g-2".into(),
                template_name: TemplateId::MomentumRanker,
                sharpe_ratio: 1.1,
                parameters: BTreeMap::new(),
            },
        ];
        std::fs::write(&path, serde_json::to_string(&champions).unwrap()).unwrap();

        let source = JsonChampionFile::new(&path);
        let found = source.champions(1.5).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].genome_id, "g-1");
    }

    #[test]
    fn malformed_file_is_an_explicit_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("champions.json");
        std::fs::write(&path, "not json").unwrap();

        let source = JsonChampionFile::new(&path);
        assert!(source.champions(1.5).is_err());
    }
}
