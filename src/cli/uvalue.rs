//! UValue subcommand for gvasp CLI

use crate::config::ConfigLoader;
use crate::format::{OutputFormat, format_uvalue_text, to_json_pretty};
use crate::resolver::{ConfigResolver, TemplateKind, working_dir};
use crate::uvalue::{HubbardU, UValueTable};
use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the uvalue subcommand
#[derive(Args, Debug)]
pub struct UValueArgs {
    /// Element symbols in POSCAR order (e.g. Ce O)
    #[arg(required = true, value_name = "ELEMENT")]
    pub elements: Vec<String>,

    /// Working directory used to find a .uvalue override (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn run_uvalue(loader: &ConfigLoader, args: &UValueArgs) -> Result<String> {
    let dir = working_dir(args.dir.as_deref())?;
    let resolver = ConfigResolver::new(loader.defaults());
    let template = resolver.resolve_kind(&dir, TemplateKind::UValue)?;
    info!(path = %template.path.display(), source = %template.source, "reading UValue template");

    let table = UValueTable::load(&template.path)?;
    let ldau = table.ldau(&args.elements);
    let rows: Vec<(String, HubbardU)> = args
        .elements
        .iter()
        .enumerate()
        .map(|(i, element)| {
            let u = HubbardU {
                orbital: ldau.ldaul[i],
                u: ldau.ldauu[i],
                j: ldau.ldauj[i],
            };
            (element.clone(), u)
        })
        .collect();

    match args.format {
        OutputFormat::Text => Ok(format_uvalue_text(&rows, ldau.lmaxmix)),
        OutputFormat::Json => {
            let view = json!({
                "template": template,
                "elements": rows
                    .iter()
                    .map(|(element, u)| json!({"element": element, "orbital": u.orbital, "U": u.u, "J": u.j}))
                    .collect::<Vec<_>>(),
                "LDAUL": ldau.ldaul,
                "LDAUU": ldau.ldauu,
                "LDAUJ": ldau.ldauj,
                "LMAXMIX": ldau.lmaxmix,
            });
            to_json_pretty(&view).context("failed to serialize UValue parameters")
        }
    }
}
