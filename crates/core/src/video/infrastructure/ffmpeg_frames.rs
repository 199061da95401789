//! Decode loop shared by the ffmpeg-backed readers.

use crate::shared::frame::Frame;

/// An opened input with its best video stream wired to a decoder and an
/// RGB24 converter. Frames are decoded lazily, one packet at a time.
pub(crate) struct DecodeSession {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    stream_index: usize,
    width: u32,
    height: u32,
    fps: f64,
    codec: String,
    next_index: usize,
    flushing: bool,
    done: bool,
}

impl DecodeSession {
    pub(crate) fn new(
        ictx: ffmpeg_next::format::context::Input,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No video stream found")?;

        let stream_index = stream.index();
        let rate = stream.rate();
        let fps = if rate.denominator() != 0 {
            rate.numerator() as f64 / rate.denominator() as f64
        } else {
            0.0
        };

        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;
        let width = decoder.width();
        let height = decoder.height();
        if width == 0 || height == 0 {
            return Err("Video stream reports zero dimensions".into());
        }
        let codec = decoder
            .codec()
            .map(|c| c.name().to_string())
            .unwrap_or_default();

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        Ok(Self {
            ictx,
            decoder,
            scaler,
            stream_index,
            width,
            height,
            fps,
            codec,
            next_index: 0,
            flushing: false,
            done: false,
        })
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn fps(&self) -> f64 {
        self.fps
    }

    pub(crate) fn codec(&self) -> &str {
        &self.codec
    }

    /// Next decoded frame, `None` once the input and the decoder are drained.
    pub(crate) fn next_frame(&mut self) -> Option<Result<Frame, Box<dyn std::error::Error>>> {
        if self.done {
            return None;
        }
        if let Some(result) = self.try_receive() {
            return Some(result);
        }
        if self.flushing {
            self.done = true;
            return None;
        }

        loop {
            let Some((stream, packet)) = self.ictx.packets().next() else {
                // Flush decoders that buffer frames (e.g. single still images)
                let _ = self.decoder.send_eof();
                self.flushing = true;
                let result = self.try_receive();
                if result.is_none() {
                    self.done = true;
                }
                return result;
            };

            if stream.index() != self.stream_index {
                continue;
            }
            if let Err(e) = self.decoder.send_packet(&packet) {
                log::debug!("Skipping undecodable packet: {e}");
                continue;
            }
            if let Some(result) = self.try_receive() {
                return Some(result);
            }
        }
    }

    fn try_receive(&mut self) -> Option<Result<Frame, Box<dyn std::error::Error>>> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        self.decoder.receive_frame(&mut decoded).ok()?;

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        if let Err(e) = self.scaler.run(&decoded, &mut rgb_frame) {
            return Some(Err(Box::new(e)));
        }
        let pixels = extract_rgb_pixels(&rgb_frame, self.width, self.height);
        let frame = Frame::new(pixels, self.width, self.height, 3, self.next_index);
        self.next_index += 1;
        Some(Ok(frame))
    }
}

/// Copies pixel data from an ffmpeg frame into a contiguous RGB buffer,
/// dropping any per-row stride padding.
fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}
