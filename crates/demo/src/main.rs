// File: crates/demo/src/main.rs
// Summary: Demo fits a viewport to OHLC CSV (or a synthetic range), replays drawing gestures for every tool and renders PNGs before/after pan and zoom.

use anyhow::{Context, Result};
use annotate_core::{
    ChartViewport, ClientRect, DomainPoint, DrawingOverlay, OverlayConfig, Pixel, PointerEvent, SurfaceSize,
    ToolKind, Transition,
};
use annotate_render_skia::SkiaSurface;
use log::{info, warn};
use std::path::{Path, PathBuf};

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 540.0;
const PIXEL_RATIO: f32 = 2.0;
// Overlay position inside the (imaginary) window; pointer events are in window space.
const ORIGIN: (f64, f64) = (40.0, 24.0);

struct Candle {
    t: f64,
    l: f64,
    h: f64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // annotate-demo [candles.csv] [overlay.toml]
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match args.get(1) {
        Some(p) => OverlayConfig::load(p).with_context(|| format!("failed to load config '{p}'"))?,
        None => OverlayConfig::default(),
    };

    let (candles, stem) = match args.first() {
        Some(raw) => {
            let (path, used_alt) = resolve_path(raw)?;
            info!("Using input file: {}", path.display());
            if used_alt {
                info!("  (extension swapped between .csv/.cvs)");
            }
            let candles = load_ohlc_csv(&path)
                .with_context(|| format!("failed to load CSV '{}'", path.display()))?;
            if candles.is_empty() {
                anyhow::bail!("no candles loaded, check headers/delimiter.");
            }
            (candles, short_stem(&path))
        }
        None => {
            info!("No CSV given, using a synthetic 6h series");
            (synthetic_candles(240), "synthetic".to_string())
        }
    };
    info!("Loaded {} candles", candles.len());

    let (first, last) = (candles[0].t, candles[candles.len() - 1].t);
    let (min_p, max_p) = minmax_price(&candles);
    info!("Price range: [{:.4}, {:.4}]", min_p, max_p);

    let mut viewport = ChartViewport::new(WIDTH as f32, HEIGHT as f32);
    viewport.fit(first, last, min_p, max_p);

    let mut overlay: DrawingOverlay<SkiaSurface> = DrawingOverlay::new(&config)?;
    overlay.set_bounds(ClientRect::new(ORIGIN.0, ORIGIN.1, WIDTH, HEIGHT), PIXEL_RATIO)?;
    overlay.set_surface(SkiaSurface::new(SurfaceSize::new(WIDTH as f32, HEIGHT as f32, PIXEL_RATIO))?)?;
    overlay.attach(viewport.notifier());

    replay_gestures(&mut overlay, &viewport);
    info!("{} drawing(s) committed", overlay.drawings().len());
    for d in overlay.drawings() {
        let pts: Vec<String> = d.points().iter().take(3).map(describe).collect();
        let more = d.points().len().saturating_sub(3);
        info!(
            "  {} {} color {} [{}{}]",
            d.tool(),
            d.id(),
            d.color(),
            pts.join(", "),
            if more > 0 { format!(", +{more} more") } else { String::new() }
        );
    }
    let stored: Vec<Vec<DomainPoint>> = overlay.drawings().iter().map(|d| d.points().to_vec()).collect();

    render_to(&mut overlay, &viewport, &out_name(&stem, "drawn"))?;

    viewport.pan_by_pixels(-(WIDTH as f32) * 0.15, 40.0);
    render_to(&mut overlay, &viewport, &out_name(&stem, "panned"))?;

    viewport.zoom_at(Pixel::new(WIDTH as f32 * 0.5, HEIGHT as f32 * 0.5), 1.6);
    render_to(&mut overlay, &viewport, &out_name(&stem, "zoomed"))?;

    let unchanged = overlay
        .drawings()
        .iter()
        .zip(&stored)
        .all(|(d, before)| d.points() == before.as_slice());
    info!("Domain points unchanged across pan/zoom: {}", unchanged);

    overlay.detach();
    Ok(())
}

/// Pointer script in surface fractions, one gesture per tool.
fn replay_gestures(overlay: &mut DrawingOverlay<SkiaSurface>, viewport: &ChartViewport) {
    let at = |fx: f64, fy: f64| (ORIGIN.0 + fx * WIDTH, ORIGIN.1 + fy * HEIGHT);
    let send = |overlay: &mut DrawingOverlay<SkiaSurface>, ev: PointerEvent| {
        if let Transition::Finalized(f) = overlay.handle_pointer(ev, viewport) {
            info!("finalized {} with {} point(s)", f.tool, f.points.len());
        }
    };
    let down = |(x, y): (f64, f64)| PointerEvent::Down { x, y };
    let mv = |(x, y): (f64, f64)| PointerEvent::Move { x, y };
    let up = |(x, y): (f64, f64)| PointerEvent::Up { x, y };

    overlay.set_active_tool(ToolKind::Trendline);
    send(overlay, down(at(0.08, 0.80)));
    send(overlay, mv(at(0.20, 0.60)));
    send(overlay, up(at(0.35, 0.30)));

    overlay.set_active_tool(ToolKind::Ray);
    send(overlay, down(at(0.10, 0.20)));
    send(overlay, up(at(0.25, 0.28)));

    overlay.set_active_tool(ToolKind::HorizontalLine);
    send(overlay, down(at(0.50, 0.45)));

    overlay.set_active_tool(ToolKind::VerticalLine);
    send(overlay, down(at(0.62, 0.10)));

    overlay.set_active_tool(ToolKind::Rectangle);
    send(overlay, down(at(0.68, 0.15)));
    send(overlay, mv(at(0.80, 0.30)));
    send(overlay, up(at(0.90, 0.40)));

    // abandoned rectangle: pointer leaves the surface mid-gesture
    send(overlay, down(at(0.70, 0.70)));
    send(overlay, PointerEvent::Leave);

    overlay.set_active_tool(ToolKind::Brush);
    send(overlay, down(at(0.40, 0.85)));
    for i in 1..=40 {
        let fx = 0.40 + i as f64 * 0.005;
        let fy = 0.85 - (i as f64 * 0.3).sin() * 0.05;
        send(overlay, mv(at(fx, fy)));
    }
    send(overlay, up(at(0.61, 0.85)));

    overlay.set_active_tool(ToolKind::None);
}

fn render_to(overlay: &mut DrawingOverlay<SkiaSurface>, viewport: &ChartViewport, out: &Path) -> Result<()> {
    let stats = match overlay.render_if_needed(viewport) {
        Some(stats) => stats,
        None => overlay.render(viewport).context("overlay has no surface")?,
    };
    if stats.skipped > 0 {
        warn!("{} drawing(s) outside the resolvable range", stats.skipped);
    }
    overlay
        .surface_mut()
        .context("overlay has no surface")?
        .write_png(out)
        .with_context(|| format!("writing {}", out.display()))?;
    info!("Wrote {} ({} painted, {} skipped)", out.display(), stats.painted, stats.skipped);
    Ok(())
}

fn describe(p: &DomainPoint) -> String {
    match p.datetime() {
        Some(dt) if p.time > 1e9 => format!("{} @ {:.4}", dt.format("%Y-%m-%d %H:%M"), p.price),
        _ => format!("t={:.2} @ {:.4}", p.time, p.price),
    }
}

/// 6h candles starting 2024-01-01 UTC on a drifting sine.
fn synthetic_candles(n: usize) -> Vec<Candle> {
    let start = 1_704_067_200.0;
    (0..n)
        .map(|i| {
            let mid = 100.0 + (i as f64 * 0.05).sin() * 12.0 + i as f64 * 0.04;
            Candle { t: start + i as f64 * 21_600.0, l: mid - 1.5, h: mid + 1.5 }
        })
        .collect()
}

/// Resolve path, trying .csv/.cvs swap if needed.
/// Returns (actual_path, used_alt)
fn resolve_path(raw: &str) -> Result<(PathBuf, bool)> {
    let p = Path::new(raw);
    if p.exists() {
        return Ok((p.to_path_buf(), false));
    }
    if let Some(alt) = swap_ext(p) {
        if alt.exists() {
            return Ok((alt, true));
        }
    }
    anyhow::bail!("file not found: {}", p.display());
}

fn short_stem(input: &Path) -> String {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("chart");
    stem.split('_').take(3).collect::<Vec<_>>().join("_")
}

/// Produce output file name like target/out/annotate_<stem>_<suffix>.png
fn out_name(stem: &str, suffix: &str) -> PathBuf {
    let mut out = PathBuf::from("target/out");
    if stem.is_empty() {
        out.push(format!("annotate_{}.png", suffix));
    } else {
        out.push(format!("annotate_{}_{}.png", stem, suffix));
    }
    out
}

/// Load Binance-like OHLC CSV; only time, low and high are needed to fit the view.
fn load_ohlc_csv(path: &Path) -> Result<Vec<Candle>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr
        .headers()?
        .iter()
        .map(|h| h.to_lowercase())
        .collect::<Vec<_>>();
    info!("Headers: {:?}", headers);

    let idx = |names: &[&str]| -> Option<usize> { headers.iter().position(|h| names.contains(&h.as_str())) };

    // Common Binance headers
    let i_time = idx(&["time", "timestamp", "open_time", "date", "datetime"]);
    let i_high = idx(&["high", "h"]);
    let i_low = idx(&["low", "l"]);

    if i_high.is_none() || i_low.is_none() {
        warn!("Could not find high/low columns.");
    }

    let mut out = Vec::new();
    let mut row_index = 0_f64;

    for rec in rdr.records() {
        let rec = rec?;
        let parse = |i: Option<usize>| -> Option<f64> { i.and_then(|ix| rec.get(ix)).and_then(|s| s.trim().parse::<f64>().ok()) };

        let t = match i_time.and_then(|ix| rec.get(ix)).and_then(parse_time_to_f64) {
            Some(t) => t,
            None => row_index,
        };
        row_index += 1.0;

        if let (Some(l), Some(h)) = (parse(i_low), parse(i_high)) {
            out.push(Candle { t, l, h });
        }
    }
    Ok(out)
}

fn parse_time_to_f64(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let n = s.parse::<i64>().ok()?;
    if n > 10_i64.pow(12) {
        return Some(n as f64 / 1000.0); // epoch ms -> sec
    }
    Some(n as f64)
}

fn swap_ext(p: &Path) -> Option<PathBuf> {
    let mut alt = p.to_path_buf();
    let ext = p.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "cvs" => {
            alt.set_extension("csv");
            Some(alt)
        }
        "csv" => {
            alt.set_extension("cvs");
            Some(alt)
        }
        _ => None,
    }
}

fn minmax_price(c: &[Candle]) -> (f64, f64) {
    let mut min_p = f64::INFINITY;
    let mut max_p = f64::NEG_INFINITY;
    for k in c {
        min_p = min_p.min(k.l);
        max_p = max_p.max(k.h);
    }
    (min_p, max_p)
}
