use glyph_fractal::{Algorithm, GenerationSettings, PaletteName, Size};

use rand::rngs::OsRng;
use rand::Rng;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use structopt::clap::Shell;
use structopt::StructOpt;
use structopt_flags::QuietVerbose;

fn load_settings(s: &str) -> Result<GenerationSettings, String> {
    let path = PathBuf::from(s);
    let file = File::open(path).map_err(|e| format!("Failed to open settings file: {}", e))?;
    let reader = BufReader::new(file);
    let settings = serde_json::from_reader(reader)
        .map_err(|e| format!("Failed to parse settings file: {}", e))?;
    Ok(settings)
}

#[derive(Debug)]
pub struct AppConfig {
    pub settings: GenerationSettings,
    pub canvas: Size,
    pub glyph_size: u32,
    pub font_path: Option<PathBuf>,
    pub output_path: PathBuf,
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "Glyph Fractal",
    about = "Grow fractal compositions out of a rendered glyph"
)]
pub struct Opt {
    #[structopt(flatten)]
    pub verbose: QuietVerbose,

    #[structopt(help = "Text to sample the motif from", required_unless = "completions")]
    text: Option<String>,

    #[structopt(parse(from_os_str), help = "Output image", required_unless = "completions")]
    output: Option<PathBuf>,

    #[structopt(
        parse(try_from_str),
        short,
        long,
        default_value = "800x600",
        help = "Canvas size"
    )]
    canvas: Size,

    #[structopt(long, default_value = "60", help = "Glyph size in pixels")]
    glyph_size: u32,

    #[structopt(
        parse(try_from_str),
        short,
        long,
        default_value = "recursive-division",
        help = "recursive-division, spiral-transform, tree-branching or geometric-tiling"
    )]
    algorithm: Algorithm,

    #[structopt(short, long, default_value = "5", help = "Iteration budget")]
    iterations: u32,

    #[structopt(parse(try_from_str), short, long, help = "Random seed")]
    seed: Option<u64>,

    #[structopt(parse(try_from_str), short, long, default_value = "neon", help = "Color palette")]
    palette: PaletteName,

    #[structopt(parse(from_os_str), short, long, help = "TrueType font file")]
    font: Option<PathBuf>,

    #[structopt(long, default_value = "sans-serif", help = "Family name the font is registered under")]
    font_family: String,

    #[structopt(long, default_value = "400", help = "Font weight")]
    font_weight: u16,

    #[structopt(
        parse(try_from_str = load_settings),
        long,
        help = "JSON settings file, replaces the generation flags"
    )]
    settings: Option<GenerationSettings>,

    #[structopt(long, possible_values= &Shell::variants(), case_insensitive = true, help = "Generate shell completions and exit")]
    pub completions: Option<Shell>,
}

impl Opt {
    pub fn to_app_config(self) -> Result<AppConfig, &'static str> {
        let output_path = self.output.ok_or("Output is required")?;

        let settings = match self.settings {
            Some(settings) => settings,
            None => GenerationSettings {
                text: self.text.ok_or("Text is required")?,
                font_family: self.font_family,
                font_weight: self.font_weight,
                algorithm: self.algorithm,
                iterations: self.iterations,
                seed: self.seed.unwrap_or_else(|| OsRng.gen()),
                palette: self.palette,
            },
        };

        Ok(AppConfig {
            settings,
            canvas: self.canvas,
            glyph_size: self.glyph_size,
            font_path: self.font,
            output_path,
        })
    }
}
