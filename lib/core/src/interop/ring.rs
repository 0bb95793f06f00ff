use accessible_video_common::{InteropError, Result};
use bon::bon;
use std::marker::PhantomData;
use tracing::{debug, trace};
use wgpu::util::DeviceExt;

use super::layout::ShaderLayout;

/// Frames the GPU may still be reading while the host prepares the next one.
pub const DEFAULT_BUFFERED_FRAMES: usize = 3;

/// Host-side staging for one record type, one slot per in-flight frame.
///
/// Slots are `buffered_frames + 1` so the slot being written is never one the
/// GPU can still be reading. Each slot starts on a multiple of the uniform
/// offset alignment so it can be bound with a dynamic offset.
#[derive(Debug)]
pub struct UniformRing<T> {
    data: Vec<u8>,
    stride: usize,
    slots: usize,
    current: usize,
    _record: PhantomData<T>,
}

#[bon]
impl<T: ShaderLayout> UniformRing<T> {
    #[builder]
    pub fn new(
        #[builder(default = DEFAULT_BUFFERED_FRAMES)] buffered_frames: usize,
        #[builder(default = 256)] alignment: usize,
    ) -> Result<Self> {
        let size = T::size();
        let stride = alignment
            .max(1)
            .checked_next_power_of_two()
            .and_then(|alignment| size.checked_next_multiple_of(alignment));
        let slots = buffered_frames.checked_add(1);
        let (Some(stride), Some(slots)) = (stride, slots) else {
            return Err(InteropError::RingLayout {
                buffered_frames,
                alignment,
            });
        };
        let total = stride
            .checked_mul(slots)
            .filter(|&total| total <= isize::MAX as usize)
            .ok_or(InteropError::RingLayout {
                buffered_frames,
                alignment,
            })?;

        debug!(
            "Creating uniform ring for {}: {} slots, record size {}, stride {}",
            T::WGSL_NAME,
            slots,
            size,
            stride
        );

        Ok(Self {
            data: vec![0; total],
            stride,
            slots,
            current: 0,
            _record: PhantomData,
        })
    }

    pub fn for_device(device: &wgpu::Device, buffered_frames: usize) -> Result<Self> {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as usize;
        Self::builder()
            .buffered_frames(buffered_frames)
            .alignment(alignment)
            .build()
    }

    /// Write `value` into the next slot and make it current.
    pub fn stage(&mut self, value: &T) -> wgpu::BufferAddress {
        let next = (self.current + 1) % self.slots;
        let start = next * self.stride;
        self.data[start..start + T::size()].copy_from_slice(value.as_bytes());
        self.current = next;
        trace!("Staged {} into slot {} at offset {}", T::WGSL_NAME, next, start);
        self.current_offset()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_offset(&self) -> wgpu::BufferAddress {
        (self.current * self.stride) as wgpu::BufferAddress
    }

    pub fn current(&self) -> T {
        self.read(self.current)
    }

    pub fn slot(&self, index: usize) -> Result<T> {
        if index >= self.slots {
            return Err(InteropError::RingIndex {
                index,
                count: self.slots,
            });
        }
        Ok(self.read(index))
    }

    fn read(&self, index: usize) -> T {
        let start = index * self.stride;
        bytemuck::pod_read_unaligned(&self.data[start..start + T::size()])
    }

    pub fn len(&self) -> usize {
        self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots == 0
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn binding_size() -> Option<wgpu::BufferSize> {
        wgpu::BufferSize::new(T::size() as u64)
    }

    pub fn create_buffer(&self, device: &wgpu::Device) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{}_uniform_ring", T::WGSL_NAME)),
            contents: &self.data,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    pub fn upload_current(&self, queue: &wgpu::Queue, buffer: &wgpu::Buffer) {
        let start = self.current * self.stride;
        queue.write_buffer(
            buffer,
            self.current_offset(),
            &self.data[start..start + T::size()],
        );
    }
}
