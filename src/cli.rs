//! Minimal CLI: demo round trip, schema, audit and normalize paged-person documents
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;

use json_bind::audit::{audit, Finding};
use json_bind::samples::{sample_paged_persons, PagedPersons};
use json_bind::{schema, text, Composite, JsonConvert};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// encode/decode paged-person JSON documents through the typed field registry
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// encode the built-in sample, write it, read it back and compare
    Demo(DemoOut),
    /// print the JSON-schema-ish view of the paged-person model
    Schema(SchemaOut),
    /// report what decoding each document would silently coerce, default or drop
    Check(CheckIn),
    /// decode each document and print its canonical re-encoding
    Normalize(NormalizeOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/result)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct DemoOut {
    /// file the sample is written to and read back from
    #[arg(short, long, default_value = "example.json")]
    out: PathBuf,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct CheckIn {
    #[command(flatten)]
    input_settings: InputSettings,
}

#[derive(clap::Parser, Debug)]
struct NormalizeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output file, one document per line (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// One parsed document and where it came from.
struct Document {
    origin: String,
    node: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut out = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            if self.ndjson {
                for (i, line) in source.lines().enumerate().filter(|(_, l)| !l.trim().is_empty()) {
                    let node = parse_strict(line)
                        .with_context(|| format!("failed to parse JSON ({source_path_str}:{})", i + 1))?;
                    out.push(self.select(format!("{source_path_str}:{}", i + 1), node)?);
                }
            } else {
                let node = parse_strict(&source)
                    .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
                out.push(self.select(source_path_str, node)?);
            }
        }
        tracing::debug!(documents = out.len(), "loaded input documents");
        Ok(out)
    }

    fn select(&self, origin: String, node: Value) -> Result<Document> {
        let node = match self.json_pointer.as_deref() {
            None => node,
            Some(pointer) => match node.pointer(pointer) {
                Some(sub) => sub.clone(),
                None => bail!("JSON pointer {pointer} matched nothing in {origin}"),
            },
        };
        Ok(Document { origin, node })
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<bool> {
        match &self.cmd {
            Command::Demo(target) => run_demo(&target.out),
            Command::Schema(target) => {
                let schema_src = text::print_pretty(&schema::json_schema::<PagedPersons>());
                write_or_print(target.out.as_deref(), &schema_src)?;
                Ok(true)
            }
            Command::Check(target) => {
                let documents = target.input_settings.load_documents()?;
                let reports: Vec<(&Document, Vec<Finding>)> = documents
                    .par_iter()
                    .map(|doc| (doc, audit::<PagedPersons>(&doc.node)))
                    .collect();
                let mut clean = true;
                for (doc, findings) in reports {
                    if findings.is_empty() {
                        println!("{} {}", "✅".green(), doc.origin);
                        continue;
                    }
                    clean = false;
                    println!("{} {} ({} findings)", "❌".red(), doc.origin, findings.len());
                    for finding in findings {
                        println!("    {}", finding.to_string().yellow());
                    }
                }
                Ok(clean)
            }
            Command::Normalize(target) => {
                let documents = target.input_settings.load_documents()?;
                let lines: Vec<String> = documents
                    .par_iter()
                    .map(|doc| text::print(&json_bind::from_json::<PagedPersons>(&doc.node).to_json()))
                    .collect();
                write_or_print(target.out.as_deref(), &lines.join("\n"))?;
                Ok(true)
            }
        }
    }
}

fn run_demo(path: &Path) -> Result<bool> {
    let paged = sample_paged_persons();
    let raw_json = paged.to_raw_json();
    println!("{}", String::from_utf8_lossy(&raw_json));

    write_or_print(Some(path), &String::from_utf8_lossy(&raw_json))?;
    let read_back = std::fs::read(path)
        .with_context(|| format!("can not open file to read ({})", path.display()))?;

    let mut decoded = PagedPersons::default();
    decoded.decode_bytes(&read_back);
    if decoded == paged {
        println!("{} round trip through {} reproduced the sample", "✅".green(), path.display());
        Ok(true)
    } else {
        println!("{} round trip through {} differs: {decoded:#?}", "❌".red(), path.display());
        Ok(false)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Input files are parsed strictly; the lenient path is for the decoder only.
fn parse_strict(src: &str) -> Result<Value> {
    Ok(serde_json::from_str::<Value>(src)?)
}

fn write_or_print(out: Option<&Path>, contents: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, contents).with_context(|| format!("failed to write {}", out.display()))?;
            tracing::info!(path = %out.display(), bytes = contents.len(), "wrote output");
        }
        None => println!("{contents}"),
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
