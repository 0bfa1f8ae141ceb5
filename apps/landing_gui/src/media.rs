//! GIF assets of the page: urls, decoding, playback clock and the lazy preload trigger.

use std::io::Cursor;

pub const HERO_GIF_URL: &str = "https://media.giphy.com/media/l0MYt5jPR6QX5pnqM/giphy.gif";

/// Vibe section cards first, then the closing section.
pub const VIBE_GIF_URLS: [&str; 3] = [
    "https://media0.giphy.com/media/v1.Y2lkPTc5MGI3NjExcjBobWU2NHJneDlwNG84aXRvYXMwYXpnc2R1ZzQ2d2l5eHJiZjU4MSZlcD12MV9pbnRlcm5hbF9naWZfYnlfaWQmY3Q9Zw/5wFkqt6A8R4qAqGIFQ/giphy.gif",
    "https://media2.giphy.com/media/v1.Y2lkPTc5MGI3NjExbmxuamllY2oxb3hsN2g0ejdmOXl2M2Ntd2lkdHU2NDJ5ZmllcWY1YSZlcD12MV9pbnRlcm5hbF9naWZfYnlfaWQmY3Q9Zw/mQampxivdZze8/giphy.gif",
    "https://media0.giphy.com/media/v1.Y2lkPTc5MGI3NjExb2hrb2Z5bm9rcTV0bDMzbHhzOWVsZ2k5cW9naXp6dzlqdGN2Mmk5NiZlcD12MV9pbnRlcm5hbF9naWZfYnlfaWQmY3Q9Zw/11lz62kfEmsM00/giphy.gif",
];

/// Loading starts this far before the vibe section scrolls into view.
pub const PRELOAD_ROOT_MARGIN: f32 = 200.0;

const MAX_FRAME_EDGE: u32 = 640;
const MIN_FRAME_DELAY_MS: u32 = 20;
const MAX_FRAME_DELAY_MS: u32 = 10_000;
const STILL_FRAME_DELAY_MS: u32 = 100;

#[derive(Clone)]
pub(crate) struct GifFrame {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) rgba: Vec<u8>,
    pub(crate) delay_ms: u32,
}

#[derive(Clone)]
pub(crate) struct DecodedGif {
    pub(crate) frames: Vec<GifFrame>,
}

/// Shrinks frames larger than `MAX_FRAME_EDGE`; smaller frames keep their size.
fn fit_frame(image: image::DynamicImage) -> image::RgbaImage {
    if image.width() > MAX_FRAME_EDGE || image.height() > MAX_FRAME_EDGE {
        image.thumbnail(MAX_FRAME_EDGE, MAX_FRAME_EDGE).to_rgba8()
    } else {
        image.into_rgba8()
    }
}

fn is_gif(bytes: &[u8]) -> bool {
    bytes.len() >= 6 && (&bytes[..6] == b"GIF87a" || &bytes[..6] == b"GIF89a")
}

/// Decodes every GIF frame; other image formats become a single still frame.
pub(crate) fn decode_gif(bytes: &[u8]) -> Result<DecodedGif, String> {
    use image::AnimationDecoder;

    if !is_gif(bytes) {
        let still = fit_frame(
            image::load_from_memory(bytes).map_err(|err| format!("image decode failed: {err}"))?,
        );
        return Ok(DecodedGif {
            frames: vec![GifFrame {
                width: still.width() as usize,
                height: still.height() as usize,
                rgba: still.into_raw(),
                delay_ms: STILL_FRAME_DELAY_MS,
            }],
        });
    }

    let decoder = image::codecs::gif::GifDecoder::new(Cursor::new(bytes))
        .map_err(|e| format!("gif decode init failed: {e}"))?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| format!("gif frame decode failed: {e}"))?;
    if frames.is_empty() {
        return Err("gif has no frames".to_string());
    }

    let mut out_frames = Vec::with_capacity(frames.len());
    for frame in frames {
        let (num, den) = frame.delay().numer_denom_ms();
        let delay_ms = if den == 0 {
            STILL_FRAME_DELAY_MS
        } else {
            ((num as f32 / den as f32).round() as u32).clamp(MIN_FRAME_DELAY_MS, MAX_FRAME_DELAY_MS)
        };

        let resized = fit_frame(image::DynamicImage::ImageRgba8(frame.into_buffer()));
        out_frames.push(GifFrame {
            width: resized.width() as usize,
            height: resized.height() as usize,
            rgba: resized.into_raw(),
            delay_ms,
        });
    }

    Ok(DecodedGif { frames: out_frames })
}

/// Frame clock for a decoded GIF, driven by the UI's input time in seconds.
pub(crate) struct GifPlayback {
    gif: DecodedGif,
    current_frame: usize,
    next_frame_at_secs: Option<f64>,
}

impl GifPlayback {
    pub(crate) fn new(gif: DecodedGif) -> Self {
        Self {
            gif,
            current_frame: 0,
            next_frame_at_secs: None,
        }
    }

    pub(crate) fn current_frame(&self) -> &GifFrame {
        &self.gif.frames[self.current_frame]
    }

    pub(crate) fn is_animated(&self) -> bool {
        self.gif.frames.len() > 1
    }

    /// Returns true when the visible frame changed.
    pub(crate) fn advance(&mut self, now_secs: f64) -> bool {
        let Some(mut next_at) = self.next_frame_at_secs else {
            self.next_frame_at_secs =
                Some(now_secs + f64::from(self.current_frame().delay_ms) / 1000.0);
            return false;
        };
        if !self.is_animated() {
            return false;
        }

        let start = self.current_frame;
        while now_secs >= next_at {
            self.current_frame = (self.current_frame + 1) % self.gif.frames.len();
            next_at += f64::from(self.current_frame().delay_ms) / 1000.0;
        }
        self.next_frame_at_secs = Some(next_at);
        self.current_frame != start
    }
}

/// One-shot trigger: fires the first time the watched section comes within
/// `PRELOAD_ROOT_MARGIN` of the visible viewport, then stays spent.
#[derive(Debug, Default)]
pub(crate) struct PreloadGate {
    fired: bool,
}

impl PreloadGate {
    pub(crate) fn has_fired(&self) -> bool {
        self.fired
    }

    /// All coordinates are in the same vertical space (screen points).
    pub(crate) fn observe(
        &mut self,
        section_top: f32,
        section_bottom: f32,
        viewport_top: f32,
        viewport_bottom: f32,
    ) -> bool {
        if self.fired {
            return false;
        }
        let intersects = section_top <= viewport_bottom + PRELOAD_ROOT_MARGIN
            && section_bottom >= viewport_top - PRELOAD_ROOT_MARGIN;
        if intersects {
            self.fired = true;
        }
        intersects
    }
}

#[cfg(test)]
#[path = "tests/media_tests.rs"]
mod tests;
