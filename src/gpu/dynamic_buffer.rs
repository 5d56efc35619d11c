//! Per-frame vertex and instance buffers that grow to fit what the scene
//! draws this frame.

use std::marker::PhantomData;

/// Smallest allocation, in bytes.
const MIN_BYTES: u64 = 256;

/// A vertex-rate or instance-rate buffer of `T`, rewritten every frame.
///
/// The allocation at least doubles when a frame needs more room and is
/// never shrunk, so a scene that settles at a steady size stops
/// reallocating after a few frames.
pub struct TypedBuffer<T> {
    buffer: wgpu::Buffer,
    label: String,
    usage: wgpu::BufferUsages,
    capacity: u64,
    count: usize,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> TypedBuffer<T> {
    /// Buffer with room for `capacity` items before the first growth.
    #[must_use]
    pub fn with_capacity(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let bytes = item_bytes::<T>(capacity).max(MIN_BYTES);
        Self {
            buffer: allocate(device, label, bytes, usage),
            label: label.to_owned(),
            usage,
            capacity: bytes,
            count: 0,
            _marker: PhantomData,
        }
    }

    /// Upload `items`, reallocating first if they do not fit.
    ///
    /// Returns `true` if the underlying buffer was replaced.
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        items: &[T],
    ) -> bool {
        let needed = item_bytes::<T>(items.len());
        let grown = needed > self.capacity;
        if grown {
            let bytes = grown_capacity(self.capacity, needed);
            log::debug!(
                "{}: {} -> {bytes} bytes for {} items",
                self.label,
                self.capacity,
                items.len()
            );
            self.buffer = allocate(device, &self.label, bytes, self.usage);
            self.capacity = bytes;
        }
        if !items.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(items));
        }
        self.count = items.len();
        grown
    }

    /// The GPU buffer.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Items uploaded by the last `write`.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the last `write` uploaded nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

fn allocate(
    device: &wgpu::Device,
    label: &str,
    bytes: u64,
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: bytes,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn item_bytes<T>(count: usize) -> u64 {
    (size_of::<T>() * count) as u64
}

/// Allocation after growing from `current` to hold `needed` bytes.
fn grown_capacity(current: u64, needed: u64) -> u64 {
    needed.max(current * 2)
}
