//! # Persistência — Tesauro e Relatórios em Disco
//!
//! Serializa o [`MemoryThesaurus`] e os [`TrainingReport`]s como JSON
//! "pretty-printed", para facilitar inspeção manual. Os arquivos de regras
//! têm formato próprio, em [`rules::file`](crate::rules::file).
//!
//! ## Índices
//!
//! O índice descritor → triggers do tesauro é `#[serde(skip)]` e
//! reconstruído após carregamento via [`MemoryThesaurus::rebuild_index()`].
//!
//! ## Atomicidade
//!
//! A escrita passa por um arquivo `.tmp` renomeado no fim: um crash durante
//! a escrita deixa o arquivo anterior intacto.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::RwLock;

use crate::thesaurus::MemoryThesaurus;
use crate::training::TrainingReport;

/// Salva o tesauro em disco como JSON pretty-printed.
///
/// Cria o diretório pai se não existir. Adquire um read lock no tesauro,
/// então o treinamento semântico pode continuar lendo em paralelo.
pub fn save_thesaurus(thesaurus: &Arc<RwLock<MemoryThesaurus>>, path: &Path) -> Result<()> {
    let json = {
        let read = thesaurus.read();
        serde_json::to_string_pretty(&*read).context("Falha ao serializar tesauro")?
    };
    write_atomic(path, &json).with_context(|| format!("Falha ao escrever {}", path.display()))?;
    tracing::info!(path = %path.display(), "Tesauro salvo");
    Ok(())
}

/// Carrega o tesauro do disco, ou cria um vazio se o arquivo não existir.
///
/// # Erros
///
/// Retorna erro se o arquivo existir mas estiver corrompido.
pub fn load_thesaurus(path: &Path) -> Result<MemoryThesaurus> {
    if !path.exists() {
        tracing::info!("Nenhum {} encontrado, iniciando tesauro vazio", path.display());
        return Ok(MemoryThesaurus::new());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Falha ao ler {}", path.display()))?;
    let mut thesaurus: MemoryThesaurus = serde_json::from_str(&json)
        .with_context(|| format!("Falha ao desserializar {}", path.display()))?;
    thesaurus.rebuild_index();
    tracing::info!(
        triggers = thesaurus.trigger_count(),
        descriptors = thesaurus.descriptor_count(),
        "Tesauro carregado"
    );
    Ok(thesaurus)
}

/// Salva o relatório de uma sessão de treinamento.
pub fn save_report(report: &TrainingReport, path: &Path) -> Result<()> {
    let json = report.to_json().context("Falha ao serializar relatório")?;
    write_atomic(path, &json).with_context(|| format!("Falha ao escrever {}", path.display()))
}

/// Escreve num `.tmp` vizinho e renomeia no fim, criando o diretório pai.
///
/// Também usada pelos arquivos de regras.
pub(crate) fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thesaurus::Thesaurus;

    #[test]
    fn missing_file_gives_empty_thesaurus() {
        let dir = tempfile::tempdir().unwrap();
        let thesaurus = load_thesaurus(&dir.path().join("absent.json")).unwrap();
        assert_eq!(thesaurus.trigger_count(), 0);
    }

    #[test]
    fn thesaurus_survives_a_round_trip_with_its_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/thesaurus.json");
        let mut thesaurus = MemoryThesaurus::new();
        thesaurus.bump_descriptor("Langue");
        thesaurus.connect("mot dingue", "Langue", 4.0);
        thesaurus.connect("phrase", "Langue", 8.0);
        thesaurus.set_alias("Linguistique", "Langue");
        save_thesaurus(&Arc::new(RwLock::new(thesaurus)), &path).unwrap();
        assert!(!path.with_extension("tmp").exists());

        let back = load_thesaurus(&path).unwrap();
        assert_eq!(back.descriptors["Langue"].count, 1);
        assert_eq!(back.primeval("Linguistique"), "Langue");
        // o índice reverso foi reconstruído: o máximo do descritor é 8
        assert!((back.pondered_weight("mot dingue", "Langue") - 0.5).abs() < 1e-12);
        assert_eq!(back.trigger("phrase").unwrap().len(), 1);
    }

    #[test]
    fn corrupted_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thesaurus.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_thesaurus(&path).unwrap_err();
        assert!(format!("{err:#}").contains("desserializar"));
    }
}
