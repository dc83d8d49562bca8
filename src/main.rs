use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tourtree::{process_queries, DynamicForest, Query, QueryKind, Vertex};

#[derive(Parser, Debug)]
#[command(
    name = "tourtree",
    about = "Dynamic forest connectivity over splay-backed Euler tours"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply a batch of queries to a forest, printing one boolean per check.
    Run {
        /// Graph file: a vertex count line, then one `u v` edge per line.
        graph: PathBuf,
        /// Query file: one `check|link|cut u v` per line.
        queries: PathBuf,
    },
    /// Answer a single connectivity query against a forest.
    Connected {
        /// Graph file: a vertex count line, then one `u v` edge per line.
        graph: PathBuf,
        /// First vertex.
        u: Vertex,
        /// Second vertex.
        v: Vertex,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { graph, queries } => run_batch(graph, queries)?,
        Commands::Connected { graph, u, v } => run_connected(graph, u, v)?,
    }

    Ok(())
}

fn run_batch(graph_path: PathBuf, queries_path: PathBuf) -> Result<()> {
    let mut forest = read_graph_file(&graph_path)
        .with_context(|| format!("failed to read graph from {}", graph_path.display()))?;
    let queries = read_query_file(&queries_path)
        .with_context(|| format!("failed to read queries from {}", queries_path.display()))?;

    let answers = process_queries(&mut forest, &queries).context("query batch failed")?;
    for answer in answers {
        println!("{answer}");
    }

    Ok(())
}

fn run_connected(graph_path: PathBuf, u: Vertex, v: Vertex) -> Result<()> {
    let mut forest = read_graph_file(&graph_path)
        .with_context(|| format!("failed to read graph from {}", graph_path.display()))?;
    let connected = forest
        .connected(u, v)
        .with_context(|| format!("connectivity query {u} {v} failed"))?;
    println!("{connected}");

    Ok(())
}

fn read_graph_file(path: &PathBuf) -> Result<DynamicForest> {
    let reader = BufReader::new(File::open(path)?);
    let mut count: Option<usize> = None;
    let mut edges = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match count {
            None => {
                count = Some(line.parse().with_context(|| {
                    format!("invalid vertex count '{}' on line {}", line, line_no + 1)
                })?);
            }
            Some(_) => {
                let (u, v) = parse_vertex_pair(&mut line.split_whitespace())
                    .with_context(|| format!("invalid edge on line {}", line_no + 1))?;
                edges.push((u, v));
            }
        }
    }

    let count = count.ok_or_else(|| anyhow::anyhow!("graph file is empty"))?;
    let forest = DynamicForest::from_edges(count, &edges).context("graph is not a forest")?;
    Ok(forest)
}

fn read_query_file(path: &PathBuf) -> Result<Vec<Query>> {
    let reader = BufReader::new(File::open(path)?);
    let mut queries = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let query = parse_query(line)
            .with_context(|| format!("invalid query on line {}", line_no + 1))?;
        queries.push(query);
    }

    Ok(queries)
}

fn parse_query(line: &str) -> Result<Query> {
    let mut fields = line.split_whitespace();
    let kind: QueryKind = fields
        .next()
        .ok_or_else(|| anyhow::anyhow!("missing query kind"))?
        .parse()?;
    let (u, v) = parse_vertex_pair(&mut fields)?;
    Ok(Query { kind, u, v })
}

fn parse_vertex_pair(fields: &mut std::str::SplitWhitespace<'_>) -> Result<(Vertex, Vertex)> {
    let u = fields
        .next()
        .ok_or_else(|| anyhow::anyhow!("missing first vertex"))?;
    let v = fields
        .next()
        .ok_or_else(|| anyhow::anyhow!("missing second vertex"))?;
    if let Some(extra) = fields.next() {
        anyhow::bail!("unexpected trailing field '{extra}'");
    }
    Ok((
        u.parse().with_context(|| format!("invalid vertex '{u}'"))?,
        v.parse().with_context(|| format!("invalid vertex '{v}'"))?,
    ))
}
