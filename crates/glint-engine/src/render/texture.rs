use crate::device::{Gl, PixelFormat, TextureHandle, checked, checked_release};

use super::GpuError;

/// Decoded 8-bit image data, as produced by an image decoder.
#[derive(Debug, Copy, Clone)]
pub struct PixelData<'a> {
    pub width: u32,
    pub height: u32,
    /// 1 (grey), 3 (RGB) or 4 (RGBA).
    pub channels: u8,
    /// Tightly packed rows, first row first.
    pub bytes: &'a [u8],
}

/// 2D texture with linear filtering and clamp-to-edge wrapping.
pub struct Texture {
    gl: Gl,
    handle: TextureHandle,
    width: u32,
    height: u32,
    format: PixelFormat,
}

impl Texture {
    /// Uploads `pixels` into a new texture. Leaves unit 0 unbound.
    pub fn from_pixels(gl: &Gl, pixels: &PixelData<'_>) -> Result<Self, GpuError> {
        let format = PixelFormat::from_channels(pixels.channels).ok_or_else(|| {
            GpuError::InvalidPixels(format!("unsupported channel count {}", pixels.channels))
        })?;
        let expected = pixels.width as usize * pixels.height as usize * pixels.channels as usize;
        if pixels.width == 0 || pixels.height == 0 || pixels.bytes.len() != expected {
            return Err(GpuError::InvalidPixels(format!(
                "{}x{}x{} image needs {expected} bytes, got {}",
                pixels.width,
                pixels.height,
                pixels.channels,
                pixels.bytes.len()
            )));
        }

        let api = &**gl;
        let handle = checked(api, "glGenTextures", |api| api.create_texture())
            .map_err(|reason| GpuError::Allocation { what: "texture", reason })?;

        checked(api, "glActiveTexture", |api| api.active_texture(0));
        checked(api, "glBindTexture", |api| api.bind_texture(Some(handle)));
        checked(api, "glTexParameteri", |api| api.tex_default_sampling());
        checked(api, "glTexImage2D", |api| {
            api.tex_image_2d(pixels.width, pixels.height, format, pixels.bytes)
        });
        checked(api, "glBindTexture", |api| api.bind_texture(None));

        log::debug!(
            "texture {:?} uploaded ({}x{} {format:?})",
            handle.0,
            pixels.width,
            pixels.height
        );
        Ok(Self {
            gl: gl.clone(),
            handle,
            width: pixels.width,
            height: pixels.height,
            format,
        })
    }

    /// Binds to texture unit `slot`.
    pub fn bind(&self, slot: u32) {
        let api = &*self.gl;
        checked(api, "glActiveTexture", |api| api.active_texture(slot));
        checked(api, "glBindTexture", |api| api.bind_texture(Some(self.handle)));
    }

    /// Unbinds whatever is bound on the active unit.
    pub fn unbind(&self) {
        checked(&*self.gl, "glBindTexture", |api| api.bind_texture(None));
    }

    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        checked_release(&*self.gl, "glDeleteTextures", |api| api.delete_texture(self.handle));
        log::trace!("texture {:?} released", self.handle.0);
    }
}
