use clap::Parser;
use std::{io::BufWriter, path::PathBuf};

use page_template::{
    render, Color, ErrorKind, PaperSize, Pattern, TemplateError, TemplateOptions,
};

/// Renders a page template into a PDF file. The options are taken from the JSON options file
/// if one is given, and the flags override them.
#[derive(Parser, Debug)]
#[command(version, long_about = None)]
struct CliArguments {
    /// The path of the output PDF file.
    #[arg(short = 'o', long = "output", value_name = "file_path")]
    output_file_path: PathBuf,
    /// A JSON file with the `paperSize`, `pattern`, `backgroundColor` and `accentColor` options.
    #[arg(long = "options", value_name = "json_file")]
    options_path: Option<PathBuf>,
    /// One of A0 to A8 or Letter.
    #[arg(short = 's', long)]
    paper_size: Option<PaperSize>,
    /// One of blank, grid, lined, double-lined, dotted or crossed.
    #[arg(short = 'p', long)]
    pattern: Option<Pattern>,
    /// Comma-separated RGBA or grayscale-alpha components in the [0, 1] range.
    #[arg(short = 'b', long, value_name = "components")]
    background: Option<Color>,
    /// Comma-separated RGBA or grayscale-alpha components in the [0, 1] range.
    #[arg(short = 'a', long, value_name = "components")]
    accent: Option<Color>,
    /// Log every drawing step.
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() {
    if let Err(error) = fallible_main() {
        log::error!("{}", error);
        std::process::exit(1);
    }
}

fn fallible_main() -> Result<(), TemplateError> {
    let arguments = CliArguments::parse();
    env_logger::builder()
        .filter_level(if arguments.verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Info
        })
        .init();
    log::debug!("{:?}", arguments);

    let mut options = match &arguments.options_path {
        Some(options_path) => TemplateOptions::from_path(options_path)?,
        None => TemplateOptions::default(),
    };
    if let Some(paper_size) = arguments.paper_size {
        options.paper_size = paper_size;
    }
    if let Some(pattern) = arguments.pattern {
        options.pattern = pattern;
    }
    if let Some(background) = arguments.background {
        options.background_color = background;
    }
    if let Some(accent) = arguments.accent {
        options.accent_color = accent;
    }
    log::debug!("{:?}", options);

    let template = render(&options)?;
    let output_file = std::fs::File::create(&arguments.output_file_path).map_err(|error| {
        TemplateError::with_error(
            ErrorKind::EncodingError,
            "Failed to create the output file",
            &error,
        )
    })?;
    template.save(&mut BufWriter::new(output_file))?;
    log::info!(
        "Saved the {} template ({}) to the path: {:?}",
        options.pattern.label(),
        options.paper_size.label(),
        arguments.output_file_path
    );

    Ok(())
}
