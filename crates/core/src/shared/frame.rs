use ndarray::ArrayView3;

/// A single image or camera frame: contiguous pixel bytes in row-major order.
///
/// Colour frames are RGB (3 channels), grayscale frames have 1 channel.
/// Conversion to and from `image` buffers happens at I/O and drawing
/// boundaries only.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn from_rgb_image(image: image::RgbImage, index: usize) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height, 3, index)
    }

    pub fn from_gray_image(image: image::GrayImage, index: usize) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height, 1, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_grayscale(&self) -> bool {
        self.channels == 1
    }

    /// Grayscale intensity at `(x, y)`, or `None` outside the frame.
    ///
    /// Colour pixels average their channels, matching how landmark models
    /// trained on grayscale input read colour images.
    pub fn intensity(&self, x: i64, y: i64) -> Option<u8> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        let c = self.channels as usize;
        let offset = (y as usize * self.width as usize + x as usize) * c;
        let px = &self.data[offset..offset + c];
        if c == 1 {
            Some(px[0])
        } else {
            let sum: u32 = px.iter().take(3).map(|&v| v as u32).sum();
            Some((sum / 3) as u8)
        }
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Copies the pixels into an `image` RGB buffer, expanding grayscale.
    pub fn to_rgb_image(&self) -> image::RgbImage {
        if self.channels == 3 {
            image::RgbImage::from_raw(self.width, self.height, self.data.clone())
                .expect("Frame data length must match dimensions")
        } else {
            image::RgbImage::from_fn(self.width, self.height, |x, y| {
                let v = self.intensity(x as i64, y as i64).unwrap_or(0);
                image::Rgb([v, v, v])
            })
        }
    }

    /// Copies the pixels into an `image` grayscale buffer.
    pub fn to_gray_image(&self) -> image::GrayImage {
        if self.channels == 1 {
            image::GrayImage::from_raw(self.width, self.height, self.data.clone())
                .expect("Frame data length must match dimensions")
        } else {
            image::imageops::grayscale(&self.to_rgb_image())
        }
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
