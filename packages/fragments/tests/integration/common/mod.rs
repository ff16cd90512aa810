use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use ::common::storage::filesystem::FilesystemFragmentStore;
use ::common::storage::memory::MemoryFragmentStore;
use fragments::{Fragment, FragmentContent, FragmentService};
use image::{ImageFormat, Rgba, RgbaImage};

pub const OWNER: &str = "11d4c22e42c8f61feaba154683dea407";
pub const OTHER_OWNER: &str = "2b7a4f0c9e15d3a86b4c1e0f7d92a3c5";

pub struct TestApp {
    pub service: FragmentService,
}

impl TestApp {
    pub fn spawn() -> Self {
        Self {
            service: FragmentService::new(Arc::new(MemoryFragmentStore::new())),
        }
    }

    pub async fn spawn_on_disk(path: &Path) -> Self {
        let store = FilesystemFragmentStore::new(path.to_path_buf(), 1024 * 1024)
            .await
            .expect("Failed to open filesystem store");
        Self {
            service: FragmentService::new(Arc::new(store)),
        }
    }

    /// Create a fragment for [`OWNER`] and return it.
    pub async fn create(&self, content_type: &str, data: &[u8]) -> Fragment {
        self.service
            .create(OWNER, content_type, data)
            .await
            .expect("Failed to create fragment")
    }

    pub async fn read(&self, id: &str, extension: Option<&str>) -> FragmentContent {
        self.service
            .read(OWNER, id, extension)
            .await
            .expect("Failed to read fragment")
    }
}

/// A small opaque PNG encoded in memory.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("Failed to encode PNG");
    out.into_inner()
}
