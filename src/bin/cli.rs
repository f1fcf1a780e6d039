use anyhow::{bail, Context, Result};
use printbooth::camera::NokhwaCamera;
use printbooth::config::BoothConfig;
use printbooth::headless;
use printbooth::sizing::Viewport;
use printbooth::templates::{registry, TemplateRegistry};
use printbooth::units::px_to_cm;
use printbooth::testing::ScriptedCamera;
use std::env;
use std::path::PathBuf;

const USAGE: &str = "Usage: printbooth-cli <command> [args] [--json]

Commands:
  templates
  geometry <template> <width> <height>
  layout <template> <scale>
  compose <template> <background> <out> <photo>...
  capture <template> <out> [--background <key|#RRGGBB>] [--synthetic]";

fn main() -> Result<()> {
    printbooth::init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("{}", USAGE);
        std::process::exit(1);
    }

    let json = args.iter().any(|a| a == "--json");
    let config = BoothConfig::load_or_default();
    if let Err(e) = config.validate() {
        bail!("invalid configuration: {}", e);
    }
    let registry = registry();

    match args[1].as_str() {
        "templates" => cmd_templates(registry, json),
        "geometry" => cmd_geometry(registry, &config, &args, json),
        "layout" => cmd_layout(registry, &args, json),
        "compose" => cmd_compose(registry, &config, &args, json),
        "capture" => cmd_capture(registry, &config, &args, json),
        other => {
            eprintln!("Unknown command: {}\n{}", other, USAGE);
            std::process::exit(1);
        }
    }
}

/// Positional arguments after the command, flags and their values removed.
fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--json" | "--synthetic" => {}
            "--background" => i += 1,
            other => out.push(other),
        }
        i += 1;
    }
    out
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn cmd_templates(registry: &TemplateRegistry, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(registry.list())?);
    } else {
        for t in registry.list() {
            println!("{:<12} {:<18} {}", t.id, t.name, t.dimensions_label());
        }
    }
    Ok(())
}

fn cmd_geometry(
    registry: &TemplateRegistry,
    config: &BoothConfig,
    args: &[String],
    json: bool,
) -> Result<()> {
    let pos = positional(args);
    let [template_id, width, height] = pos[..] else {
        bail!("Usage: printbooth-cli geometry <template> <width> <height>");
    };
    let viewport = Viewport::new(
        width.parse().context("width must be a number")?,
        height.parse().context("height must be a number")?,
    );

    let g = headless::geometry(registry, config, template_id, viewport)?;
    if json {
        println!("{}", serde_json::to_string(&g)?);
    } else {
        println!(
            "{}: {:.1}x{:.1} px (scale {:.4}, print {:.2}x{:.2}, budget {:.1}x{:.1})",
            template_id,
            g.display_width,
            g.display_height,
            g.scale,
            g.print_width,
            g.print_height,
            g.max_width,
            g.max_height
        );
    }
    Ok(())
}

fn cmd_layout(registry: &TemplateRegistry, args: &[String], json: bool) -> Result<()> {
    let pos = positional(args);
    let [template_id, scale] = pos[..] else {
        bail!("Usage: printbooth-cli layout <template> <scale>");
    };
    let scale: f64 = scale.parse().context("scale must be a number")?;

    let placements = headless::layout(registry, template_id, scale)?;
    if json {
        println!("{}", serde_json::to_string(&placements)?);
    } else {
        for p in placements {
            println!(
                "{:<14} x={:>8.2} y={:>8.2} w={:>8.2} h={:>8.2}  ({:.2}cm x {:.2}cm)",
                p.role.to_string(),
                p.x,
                p.y,
                p.width,
                p.height,
                px_to_cm(p.width / scale),
                px_to_cm(p.height / scale)
            );
        }
    }
    Ok(())
}

fn cmd_compose(
    registry: &TemplateRegistry,
    config: &BoothConfig,
    args: &[String],
    json: bool,
) -> Result<()> {
    let pos = positional(args);
    let [template_id, background, out, photos @ ..] = &pos[..] else {
        bail!("Usage: printbooth-cli compose <template> <background> <out> <photo>...");
    };
    let photo_uris = photos.iter().map(|p| p.to_string()).collect();

    let report = headless::compose(
        registry,
        config,
        template_id,
        background,
        photo_uris,
        &PathBuf::from(out),
    )?;
    print_report(&report, json)
}

fn cmd_capture(
    registry: &TemplateRegistry,
    config: &BoothConfig,
    args: &[String],
    json: bool,
) -> Result<()> {
    let pos = positional(args);
    let [template_id, out] = pos[..] else {
        bail!("Usage: printbooth-cli capture <template> <out> [--background <key|#RRGGBB>] [--synthetic]");
    };
    let background = flag_value(args, "--background").unwrap_or("blue");
    let synthetic = args.iter().any(|a| a == "--synthetic");

    let runtime = tokio::runtime::Runtime::new()?;
    let photo_uris = runtime.block_on(async {
        if synthetic {
            let scratch = env::temp_dir().join("printbooth").join("synthetic");
            headless::capture(registry, config, template_id, ScriptedCamera::new(scratch)).await
        } else {
            let camera =
                NokhwaCamera::new(config.capture.device_index, config.storage.jpeg_quality);
            headless::capture(registry, config, template_id, camera).await
        }
    })?;

    let report = headless::compose(
        registry,
        config,
        template_id,
        background,
        photo_uris,
        &PathBuf::from(out),
    )?;
    print_report(&report, json)
}

fn print_report(report: &headless::ComposeReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
    } else {
        println!(
            "{} composed at {}x{} -> {}",
            report.template_id,
            report.width,
            report.height,
            report.path.display()
        );
    }
    Ok(())
}
