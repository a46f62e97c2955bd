//! Texture resource management for wgpu
//!
//! Creates the window depth buffer, the shadow map target and the color
//! textures decoded from image files.

use std::path::Path;

use crate::error::TextureError;

/// Decoded RGBA8 pixels, ready for upload
#[derive(Clone, Debug, PartialEq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbaImage {
    /// Reads and decodes an image file into RGBA8
    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::decode(path, &bytes)
    }

    pub fn decode(path: &Path, bytes: &[u8]) -> Result<Self, TextureError> {
        let decoded = image::load_from_memory(bytes).map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = decoded.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
        })
    }

    /// 1×1 single color texel
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: rgba.to_vec(),
        }
    }
}

/// GPU texture resource containing texture, view, and sampler
#[derive(Clone)]
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the engine
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Color textures are stored linear; the surface is non-sRGB as well
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Creates a depth texture matching the surface configuration
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        Self::create_depth_target(device, config.width, config.height, label)
    }

    /// Square depth-only target written by the shadow pass
    pub fn create_shadow_map(device: &wgpu::Device, size: u32) -> Self {
        Self::create_depth_target(device, size, size, "Shadow Map")
    }

    fn create_depth_target(device: &wgpu::Device, width: u32, height: u32, label: &str) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Depth is read with textureLoad, so filtering never applies
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Uploads RGBA8 pixels with nearest filtering and repeat addressing
    ///
    /// Hill texture coordinates run past 1.0, so every color texture repeats.
    pub fn create_from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &RgbaImage,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Loads a texture file, falling back to a zeroed 1×1 texel on failure
    pub fn load_or_blank(device: &wgpu::Device, queue: &wgpu::Queue, path: &Path) -> Self {
        let label = path.display().to_string();
        let image = match RgbaImage::load(path) {
            Ok(image) => {
                log::debug!("Loaded texture {} ({}x{})", label, image.width, image.height);
                image
            }
            Err(err) => {
                log::warn!("{}", err);
                RgbaImage::solid([0, 0, 0, 0])
            }
        };
        Self::create_from_rgba(device, queue, &image, &label)
    }

    /// 1×1 white texel for untextured drawables
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::create_from_rgba(device, queue, &RgbaImage::solid([255; 4]), "White Texture")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result = RgbaImage::load(Path::new("definitely/not/here.png"));
        assert!(matches!(result, Err(TextureError::Io { .. })));
    }

    #[test]
    fn test_garbage_bytes_are_a_decode_error() {
        let result = RgbaImage::decode(Path::new("bad.png"), b"not an image");
        assert!(matches!(result, Err(TextureError::Decode { .. })));
    }

    #[test]
    fn test_decodes_png_to_rgba8() {
        let mut png = Vec::new();
        let source = image::RgbImage::from_pixel(2, 3, image::Rgb([10, 20, 30]));
        source
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let decoded = RgbaImage::decode(Path::new("tiny.png"), &png).unwrap();
        assert_eq!((decoded.width, decoded.height), (2, 3));
        assert_eq!(decoded.pixels.len(), 2 * 3 * 4);
        assert_eq!(&decoded.pixels[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_solid_texel() {
        let texel = RgbaImage::solid([0, 0, 0, 0]);
        assert_eq!((texel.width, texel.height), (1, 1));
        assert_eq!(texel.pixels, vec![0; 4]);
    }
}
