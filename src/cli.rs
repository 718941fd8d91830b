//! Minimal CLI: load JSON → infer → render (json | compact)
use std::io::Read;
use std::path::{Path, PathBuf};
use anyhow::Context;
use clap::{Parser, Subcommand, Args, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::inference::{Inference, Ty};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer the structural shape of JSON documents and print it as a compact type description
#[derive(Parser, Debug)]
#[command(name = "json-shape", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer and print the shape of one or more documents
    Schema(SchemaOut),
    /// infer and print the shape of a built-in sample document
    Sample(OutputSettings),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct OutputSettings {
    /// print the inferred type tree instead of the rendered shape
    #[arg(long)]
    raw: bool,

    /// textual form of the output
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// print progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    output_settings: OutputSettings,

    /// unify all documents as siblings of one array instead of one shape per document
    #[arg(long)]
    merge: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// pretty-printed JSON; unions and arrays both become JSON arrays
    Json,
    /// one-line notation where unions print as tuples `('int', 'str')`
    Compact,
}

/// One loaded input document and where it came from.
#[derive(Debug, Clone)]
pub struct Document {
    pub source: String,
    pub value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> Result<Vec<Document>> {
        let mut docs = Vec::new();
        for source_path in resolve_file_path_patterns(&self.input)? {
            let (source_name, source) = read_source(&source_path)?;
            let loaded = parse_documents(&source_name, &source, self.ndjson)?;
            tracing::debug!(source = %source_name, documents = loaded.len(), "loaded");
            docs.extend(loaded);
        }
        match self.json_pointer.as_deref() {
            None => Ok(docs),
            Some(pointer) => docs.into_iter().map(|doc| select(doc, pointer)).collect(),
        }
    }
}

impl OutputSettings {
    fn banner(&self, msg: &str) {
        if self.verbose {
            eprintln!("{} {}", ">".cyan().bold(), msg);
        }
    }

    fn format_ty(&self, ty: &Ty) -> anyhow::Result<String> {
        if self.raw {
            return match self.format {
                Format::Json => Ok(serde_json::to_string_pretty(ty)?),
                Format::Compact => Ok(format!("{ty:?}")),
            };
        }
        let shape = crate::render::render(ty);
        match self.format {
            Format::Json => Ok(serde_json::to_string_pretty(&shape)?),
            Format::Compact => Ok(shape.to_string()),
        }
    }

    fn write(&self, src: &str) -> anyhow::Result<()> {
        match self.out.as_ref() {
            Some(out) => {
                if let Some(parent) = out.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                std::fs::write(out, src)
                    .with_context(|| format!("failed to write {}", out.display()))?;
            }
            None => println!("{src}"),
        }
        Ok(())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Schema(target) => {
                let output = &target.output_settings;
                let docs = target.input_settings.load().context("failed to load input")?;
                output.banner(&format!("Loaded {} document(s)", docs.len()));

                let src = if target.merge {
                    let mut inf = Inference::new();
                    for doc in &docs {
                        inf.observe_value(&doc.value);
                    }
                    output.banner("Extract");
                    let ty = inf.solve();
                    output.banner("Refine");
                    output.format_ty(&ty)?
                } else {
                    output.banner("Extract");
                    let tys = infer_documents(&docs);
                    output.banner("Refine");
                    format_many(output, &tys)?
                };
                output.write(&src)
            }
            Command::Sample(output) => {
                let value: Value = serde_json::from_str(SAMPLE_DOCUMENT)
                    .context("built-in sample is not valid JSON")?;
                output.banner("Extract");
                let ty = crate::inference::infer(&value);
                output.banner("Refine");
                output.write(&output.format_ty(&ty)?)
            }
        }
    }
}

/// Infer every document independently; documents share nothing.
pub fn infer_documents(docs: &[Document]) -> Vec<(String, Ty)> {
    docs.par_iter()
        .map(|doc| (doc.source.clone(), crate::inference::infer(&doc.value)))
        .collect()
}

fn format_many(output: &OutputSettings, tys: &[(String, Ty)]) -> anyhow::Result<String> {
    if let [(_, ty)] = tys {
        return output.format_ty(ty);
    }
    match output.format {
        Format::Json => {
            let mut all = serde_json::Map::new();
            for (source, ty) in tys {
                let v = if output.raw {
                    serde_json::to_value(ty)?
                } else {
                    crate::render::render(ty).to_json()
                };
                all.insert(source.clone(), v);
            }
            Ok(serde_json::to_string_pretty(&Value::Object(all))?)
        }
        Format::Compact => {
            let lines = tys
                .iter()
                .map(|(source, ty)| Ok(format!("{source}: {}", output.format_ty(ty)?)))
                .collect::<anyhow::Result<Vec<_>>>()?;
            Ok(lines.join("\n"))
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn read_source(path: &Path) -> Result<(String, String)> {
    if path == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
        return Ok(("<stdin>".to_string(), source));
    }
    let source = std::fs::read_to_string(path)
        .map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    Ok((path.to_string_lossy().to_string(), source))
}

/// Parse one document, or a whitespace/newline separated stream of them.
/// Stream documents are named `<source>#<index>`.
pub fn parse_documents(source_name: &str, source: &str, ndjson: bool) -> Result<Vec<Document>> {
    let json_err = |source| Error::Json { source_name: source_name.to_string(), source };
    if !ndjson {
        let value = serde_json::from_str::<Value>(source).map_err(json_err)?;
        return Ok(vec![Document { source: source_name.to_string(), value }]);
    }
    serde_json::Deserializer::from_str(source)
        .into_iter::<Value>()
        .enumerate()
        .map(|(i, value)| {
            Ok(Document {
                source: format!("{source_name}#{i}"),
                value: value.map_err(json_err)?,
            })
        })
        .collect()
}

fn select(doc: Document, pointer: &str) -> Result<Document> {
    match doc.value.pointer(pointer) {
        Some(value) => Ok(Document { value: value.clone(), source: doc.source }),
        None => Err(Error::PointerMissing {
            pointer: pointer.to_string(),
            source_name: doc.source,
        }),
    }
}

pub fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let before = out.len();
            for entry in glob::glob(pattern)? {
                out.push(entry?);
            }
            if out.len() == before {
                return Err(Error::NoMatch(pattern.to_string()));
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

/// Chain registry entry used by `sample`.
pub const SAMPLE_DOCUMENT: &str = r#"{
    "name": "Ethereum Mainnet",
    "chain": "ETH",
    "icon": "ethereum",
    "rpc": [
      "https://mainnet.infura.io/v3/${INFURA_API_KEY}",
      "wss://mainnet.infura.io/ws/v3/${INFURA_API_KEY}",
      "https://api.mycryptoapi.com/eth",
      "https://cloudflare-eth.com"
    ],
    "features": [
      { "name": "EIP155" },
      { "name": "EIP1559" }
    ],
    "faucets": [],
    "nativeCurrency": {
      "name": "Ether",
      "symbol": "ETH",
      "decimals": 18
    },
    "infoURL": "https://ethereum.org",
    "shortName": "eth",
    "chainId": 1,
    "networkId": 1,
    "slip44": 60,
    "ens": {
      "registry": "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e"
    },
    "explorers": [
      {
        "name": "etherscan",
        "url": "https://etherscan.io",
        "standard": "EIP3091"
      }
    ]
}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ndjson_documents_are_indexed() {
        let docs = parse_documents("feed", "{\"a\":1}\n{\"a\":\"x\"}\n", true).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].source, "feed#0");
        assert_eq!(docs[1].value, json!({"a": "x"}));
    }

    #[test]
    fn single_document_parse_error_names_source() {
        let err = parse_documents("broken.json", "{", false).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn pointer_selects_subnode_or_fails() {
        let doc = Document { source: "d".into(), value: json!({"data": {"items": [1]}}) };
        let picked = select(doc.clone(), "/data/items").unwrap();
        assert_eq!(picked.value, json!([1]));
        let err = select(doc, "/nope").unwrap_err();
        assert!(matches!(err, Error::PointerMissing { .. }));
    }

    #[test]
    fn literal_paths_pass_through_and_empty_globs_fail() {
        let paths = resolve_file_path_patterns(["a.json", "-"]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("a.json"), PathBuf::from("-")]);
        let err = resolve_file_path_patterns(["/definitely/not/here/*.json"]).unwrap_err();
        assert!(matches!(err, Error::NoMatch(_)));
    }

    #[test]
    fn sample_document_shape() {
        let value: Value = serde_json::from_str(SAMPLE_DOCUMENT).unwrap();
        let shape = crate::render::render(&crate::inference::infer(&value)).to_json();
        assert_eq!(shape["rpc"], json!(["str"]));
        assert_eq!(shape["features"], json!([{"name": "str"}]));
        assert_eq!(shape["faucets"], json!(["Unknown"]));
        assert_eq!(shape["nativeCurrency"]["decimals"], json!("int"));
    }

    #[test]
    fn documents_are_inferred_independently() {
        let docs = vec![
            Document { source: "a".into(), value: json!([1]) },
            Document { source: "b".into(), value: json!("x") },
        ];
        let tys = infer_documents(&docs);
        assert_eq!(tys[0].0, "a");
        assert_eq!(tys[1].1, crate::inference::infer(&json!("x")));
    }
}
