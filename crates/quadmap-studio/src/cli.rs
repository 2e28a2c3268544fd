use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use quadmap_engine::coords::{ColorRgba, Vec2};
use quadmap_engine::host::BlendMode;
use quadmap_engine::tilemap::Pose;

/// Opens a window and draws one tilemap quad.
#[derive(Parser, Debug)]
#[command(name = "quadmap-studio", version, about)]
pub struct Args {
    /// Image to draw (PNG, JPEG, ...). A checkerboard is generated when omitted.
    #[arg(short, long)]
    pub texture: Option<PathBuf>,

    /// Node position in surface (physical) pixels.
    #[arg(long, default_value_t = 100.0)]
    pub x: f32,

    #[arg(long, default_value_t = 100.0)]
    pub y: f32,

    /// Initial rotation in degrees.
    #[arg(long, default_value_t = 0.0)]
    pub rotation: f32,

    /// Uniform scale.
    #[arg(long, default_value_t = 1.0)]
    pub scale: f32,

    /// Rotation speed in degrees per second.
    #[arg(long, default_value_t = 0.0)]
    pub spin: f32,

    #[arg(long, value_enum, default_value_t = BlendArg::Normal)]
    pub blend: BlendArg,

    /// Clear color as RRGGBB hex.
    #[arg(long, default_value = "1e1e24", value_parser = parse_hex_color)]
    pub clear: u32,

    /// Log filter override (e.g. "debug", "quadmap_engine=trace").
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum BlendArg {
    Normal,
    Add,
    Multiply,
    Screen,
}

impl From<BlendArg> for BlendMode {
    fn from(b: BlendArg) -> Self {
        match b {
            BlendArg::Normal => BlendMode::Normal,
            BlendArg::Add => BlendMode::Add,
            BlendArg::Multiply => BlendMode::Multiply,
            BlendArg::Screen => BlendMode::Screen,
        }
    }
}

fn parse_hex_color(s: &str) -> Result<u32, String> {
    let digits = s.trim_start_matches('#');
    if digits.len() != 6 {
        return Err(format!("expected RRGGBB, got {s:?}"));
    }
    u32::from_str_radix(digits, 16).map_err(|e| format!("{s:?}: {e}"))
}

/// Resolved studio settings.
#[derive(Debug, Clone, PartialEq)]
pub struct StudioConfig {
    pub texture: Option<PathBuf>,
    pub pose: Pose,
    /// Radians per second.
    pub spin: f32,
    pub blend: BlendMode,
    pub clear: ColorRgba,
    pub log_filter: Option<String>,
}

impl From<Args> for StudioConfig {
    fn from(args: Args) -> Self {
        Self {
            texture: args.texture,
            pose: Pose {
                position: Vec2::new(args.x, args.y),
                rotation: args.rotation.to_radians(),
                scale: Vec2::splat(args.scale),
            },
            spin: args.spin.to_radians(),
            blend: args.blend.into(),
            clear: ColorRgba::from_hex(args.clear),
            log_filter: args.log_level,
        }
    }
}

pub fn parse() -> StudioConfig {
    Args::parse().into()
}
