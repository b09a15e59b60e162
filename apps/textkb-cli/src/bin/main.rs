use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use textkb_core::config::{expand_path, KbConfig};
use textkb_llm::{default_embedder, default_generator};
use textkb_rag::summarize::summarize;
use textkb_rag::retriever;
use textkb_vector::{CorpusBuilder, KnowledgeBase};

fn usage(prog: &str) -> ! {
    eprintln!("Usage: {prog} <command> [args...]");
    eprintln!("  index <src_dir> <kb_dir>        build/rebuild a knowledge base from .txt files");
    eprintln!("  ask <kb_dir> \"<query>\"          answer a question with citations");
    eprintln!("  summarize <kb_dir> [--goal txt] map-reduce report over the corpus");
    std::process::exit(1);
}

fn parse_args() -> (String, String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        usage(&prog);
    }
    let cmd = args.remove(0);
    (prog, cmd, args)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let (prog, cmd, args) = parse_args();
    let config = KbConfig::load()?;

    match cmd.as_str() {
        "index" => {
            let (src_dir, kb_dir) = match (args.first(), args.get(1)) {
                (Some(s), Some(k)) => (expand_path(s), expand_path(k)),
                _ => usage(&prog),
            };
            println!("Indexing {} -> {}", src_dir.display(), kb_dir.display());
            let embedder = default_embedder(&config)?;
            let builder = CorpusBuilder::new(&config, embedder);
            let info = builder.build(&src_dir, &kb_dir)?;
            println!("Knowledge base built");
            println!("  chunks:    {}", info.count);
            println!("  dimension: {}", info.dim);
            println!("  model:     {}", info.embed_model);
            println!("  location:  {}", kb_dir.display());
        }
        "ask" => {
            let (kb_dir, query) = match (args.first(), args.get(1)) {
                (Some(k), Some(q)) => (expand_path(k), q.clone()),
                _ => usage(&prog),
            };
            let kb = KnowledgeBase::open(&kb_dir)?;
            let embedder = default_embedder(&config)?;
            let generator = default_generator(&config)?;
            let answer = retriever::answer(
                &kb,
                embedder.as_ref(),
                generator.as_ref(),
                &query,
                config.retrieval.top_k,
                config.retrieval.max_context_chars,
            )?;
            println!("\nAnswer:\n{}", answer.text);
            println!("\nSources:");
            for (i, hit) in answer.cited.iter().enumerate() {
                let name = PathBuf::from(&hit.chunk.meta.file)
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| hit.chunk.meta.file.clone());
                println!(
                    "  [{}] {} (chunk #{}) score={:.3}",
                    i + 1,
                    name,
                    hit.chunk.meta.chunk_index,
                    hit.score
                );
            }
        }
        "summarize" => {
            let kb_dir = match args.first() {
                Some(k) => expand_path(k),
                None => usage(&prog),
            };
            let mut goal = "Produce a high-level summary of the corpus".to_string();
            let mut i = 1;
            while i < args.len() {
                match args[i].as_str() {
                    "--goal" => {
                        if let Some(g) = args.get(i + 1) {
                            goal = g.clone();
                            i += 1;
                        } else {
                            eprintln!("Error: --goal requires a value");
                            std::process::exit(1);
                        }
                    }
                    other => {
                        eprintln!("Unknown argument: {other}");
                        std::process::exit(1);
                    }
                }
                i += 1;
            }
            let kb = KnowledgeBase::open(&kb_dir)?;
            let generator = default_generator(&config)?;
            let report = summarize(&kb, generator.as_ref(), &config.summarize, &goal)?;
            println!("{report}");
        }
        _ => usage(&prog),
    }
    Ok(())
}
