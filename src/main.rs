//! CLI front-end: loads an image, runs the decode pipeline over it, and
//! writes an HTML report (the source image with an SVG overlay per match)
//! to stdout. A thin binary over the library crate; argument handling is
//! a single positional path, not worth pulling in an argument-parsing
//! crate for.

use std::env;
use std::process::ExitCode;

use qr_decoder::pipeline::Match;

fn usage(program: &str) {
    eprintln!("usage: {} <image-path>", program);
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

/// A message is "text" if every byte is either printable ASCII/UTF-8 or one
/// of TAB/CR/LF; anything else (NUL, other controls) renders as hex.
fn describe_message(bytes: &[u8]) -> String {
    let is_text = std::str::from_utf8(bytes).is_ok()
        && bytes.iter().all(|&b| b >= 0x20 && b != 0x7F || b == b'\t' || b == b'\r' || b == b'\n');
    if is_text {
        let text = std::str::from_utf8(bytes).unwrap();
        format!("Text message: {}", escape_html(text))
    } else {
        let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        format!("Binary message: {}", hex)
    }
}

fn render_overlay(m: &Match) -> String {
    let (x0, y0) = m.top_left;
    let (x1, y1) = m.top_right;
    let (x2, y2) = m.bottom_left;
    let (x3, y3) = m.bottom_right;
    let min_x = x0.min(x1).min(x2).min(x3);
    let min_y = y0.min(y1).min(y2).min(y3);
    let max_x = x0.max(x1).max(x2).max(x3);
    let max_y = y0.max(y1).max(y2).max(y3);
    let title = escape_html(&describe_message(&m.message));

    format!(
        "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" \
         fill=\"none\" stroke=\"red\" stroke-width=\"2\"><title>{}</title></rect>\n\
         <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"blue\" />\n\
         <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"blue\" />\n\
         <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"blue\" />",
        min_x,
        min_y,
        max_x - min_x,
        max_y - min_y,
        title,
        x0,
        y0,
        x1,
        y1,
        x2,
        y2,
    )
}

fn render_report(image_path: &str, width: u32, height: u32, matches: &[Match]) -> String {
    let overlays: String = matches.iter().map(render_overlay).collect::<Vec<_>>().join("\n");
    format!(
        "<!DOCTYPE html>\n<html><body style=\"margin:0\">\n\
         <div style=\"position:relative; width:{w}px; height:{h}px\">\n\
         <img src=\"{path}\" width=\"{w}\" height=\"{h}\" />\n\
         <svg width=\"{w}\" height=\"{h}\" style=\"position:absolute; top:0; left:0\">\n{overlays}\n</svg>\n\
         </div>\n</body></html>\n",
        w = width,
        h = height,
        path = escape_html(image_path),
        overlays = overlays,
    )
}

fn run() -> Result<String, ()> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "qrcode".to_string());
    let path = match args.next() {
        Some(p) => p,
        None => {
            usage(&program);
            return Err(());
        }
    };

    let img = match image::io::Reader::open(&path).map_err(qr_decoder::QrError::from).and_then(|r| {
        r.with_guessed_format().map_err(qr_decoder::QrError::from).and_then(|r| r.decode().map_err(qr_decoder::QrError::from))
    }) {
        Ok(img) => img.to_rgb8(),
        Err(e) => {
            eprintln!("failed to load {}: {}", path, e);
            return Err(());
        }
    };

    let (width, height) = img.dimensions();
    let matches = qr_decoder::find_qr_codes(&img);
    if matches.is_empty() {
        eprintln!("no QR codes found in {}", path);
        return Err(());
    }

    Ok(render_report(&path, width, height, &matches))
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(html) => {
            println!("{}", html);
            ExitCode::from(0)
        }
        Err(()) => ExitCode::from(1),
    }
}
