//! # semantic-tagger
//!
//! Lê um texto francês da entrada padrão e imprime as key-entities, com as
//! suas confianças, e os descritores quando há um tesauro em disco.
//!
//! ## Fluxo
//!
//! ```text
//! main()
//!   ├── Configura tracing/logging
//!   ├── Config::from_env()   ($SEMANTIC_TAGGER_CONFIG ou padrão)
//!   ├── Engine::load         (léxico + regras)
//!   ├── stdin → analyze → deduplicate_keyentities
//!   ├── imprime key-entities
//!   └── tesauro existe? → imprime descritores
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! echo "Une phrase avec un mot dingue." | cargo run
//!
//! # Com logs detalhados
//! RUST_LOG=debug SEMANTIC_TAGGER_CONFIG=config.json cargo run < article.txt
//! ```

use std::io::Read;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use semantic_tagger::persistence::load_thesaurus;
use semantic_tagger::{Config, Engine};

fn main() -> Result<()> {
    // Aceita RUST_LOG para configurar o nível; padrão info.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let thesaurus_path = config.thesaurus_path.clone();
    let synapses = config.synapses_per_trigger;
    let engine = Engine::load(config)?;

    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("Falha ao ler a entrada padrão")?;

    let mut semantical = engine.analyze(&raw).context("Falha ao analisar o texto")?;
    let removed = semantical.deduplicate_keyentities();
    tracing::info!(removed, "Key-entities deduplicadas");

    println!("# Key-entities");
    for ke in semantical.keyentities() {
        let c = ke.confidences();
        println!(
            "{}\tcount={}\tconfidence={:.4}\tpos={:.2}\thmi={:.3}\tsmi={:.3}\tnrf={:.4}",
            ke,
            ke.count(),
            ke.confidence(),
            c.pos,
            c.heuristical_mutual_information,
            c.statistical_mutual_information,
            c.nrelative_frequency,
        );
    }

    if thesaurus_path.exists() {
        let mut thesaurus = load_thesaurus(&thesaurus_path)?;
        thesaurus.set_synapses_per_trigger(synapses);
        let descriptors = semantical.descriptors(
            &thesaurus,
            engine.config().descriptors_min_score,
            engine.config().min_edge_weight,
        );
        println!("# Descritores");
        for (descriptor, score) in descriptors {
            println!("{descriptor}\t{score:.1}");
        }
    } else {
        tracing::info!(path = %thesaurus_path.display(), "Sem tesauro, descritores omitidos");
    }

    Ok(())
}
