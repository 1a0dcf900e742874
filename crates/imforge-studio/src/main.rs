use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use imforge_core::coords::Vec2;
use imforge_core::logging::{init_logging, LoggingConfig};
use imforge_designer::{export_window, import_window, layout_window, HeadlessCanvas, UiContext, UiNode};

const USAGE: &str = "usage: imforge-studio <file> [--scale K] [--rename OLD=NEW] [--export] [-v]";

/// Canvas size used for the headless layout pass.
const CANVAS: Vec2 = Vec2 { x: 1280.0, y: 800.0 };

#[derive(Debug, Default)]
struct Options {
    file: PathBuf,
    scale: Option<f32>,
    renames: Vec<(String, String)>,
    export: bool,
    verbose: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options> {
    let mut opts = Options::default();
    let mut file = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scale" => {
                let k = args.next().context("--scale needs a factor")?;
                let k: f32 = k.parse().with_context(|| format!("bad scale factor {:?}", k))?;
                if !(k.is_finite() && k > 0.0) {
                    bail!("scale factor must be positive, got {}", k);
                }
                opts.scale = Some(k);
            }
            "--rename" => {
                let spec = args.next().context("--rename needs OLD=NEW")?;
                let (old, new) = spec.split_once('=').with_context(|| format!("expected OLD=NEW, got {:?}", spec))?;
                opts.renames.push((old.to_string(), new.to_string()));
            }
            "--export" => opts.export = true,
            "-v" | "--verbose" => opts.verbose = true,
            "-h" | "--help" => bail!("{}", USAGE),
            flag if flag.starts_with('-') => bail!("unknown option {}\n{}", flag, USAGE),
            path if file.is_none() => file = Some(PathBuf::from(path)),
            extra => bail!("unexpected argument {:?}\n{}", extra, USAGE),
        }
    }
    opts.file = file.context(USAGE)?;
    Ok(opts)
}

fn main() -> Result<()> {
    let opts = parse_args(std::env::args().skip(1))?;
    init_logging(LoggingConfig::default().verbose(opts.verbose));

    let src = std::fs::read_to_string(&opts.file).with_context(|| format!("reading {}", opts.file.display()))?;
    let mut ctx = UiContext::default();
    let mut win = import_window(&src, &mut ctx).with_context(|| format!("importing {}", opts.file.display()))?;

    // ── Import report ─────────────────────────────────────────────────────
    for e in ctx.take_import_errors() {
        eprintln!("{}: skipped: {}", opts.file.display(), e);
    }

    // ── Layout ────────────────────────────────────────────────────────────
    let mut canvas = HeadlessCanvas::new(CANVAS);
    let rect = layout_window(&mut win, &mut canvas).context("layout pass")?;
    log::info!("window laid out at {}x{}", rect.size.x, rect.size.y);
    print!("{}", win.outline());

    // ── Edits ─────────────────────────────────────────────────────────────
    if let Some(k) = opts.scale {
        win.scale_dimensions(k);
        log::info!("scaled dimensions by {}", k);
    }
    for (old, new) in &opts.renames {
        let n = win.rename_field_vars(old, new);
        log::info!("renamed `{}` to `{}` in {} properties", old, new, n);
    }

    if opts.export {
        println!();
        print!("{}", export_window(&win, &ctx.config));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_all_options() {
        let opts = parse_args(args(&["ui.cpp", "--scale", "1.5", "--rename", "a=b", "--export", "-v"])).unwrap();
        assert_eq!(opts.file, PathBuf::from("ui.cpp"));
        assert_eq!(opts.scale, Some(1.5));
        assert_eq!(opts.renames, vec![("a".to_string(), "b".to_string())]);
        assert!(opts.export && opts.verbose);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["a", "b"])).is_err());
        assert!(parse_args(args(&["a", "--scale", "0"])).is_err());
        assert!(parse_args(args(&["a", "--rename", "ab"])).is_err());
        assert!(parse_args(args(&["a", "--frobnicate"])).is_err());
    }
}
