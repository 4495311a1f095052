//! Ownership of the gpu buffers of one viewer.
//!
//! The actual upload is done by a [GpuBackend]. Buffers are handles, that release their gpu
//! memory when they are dropped. The [BufferSet] makes sure, that every buffer is created on the
//! first upload, replaced when the data changes, and released when the viewer goes away.

use crate::renderer::error::RendererResult;
use crate::renderer::geometry;
use crate::renderer::settings::BaseRenderSettings;
use crate::renderer::vertex_data::{OverlayPrimitive, OverlayVertex};
use crate::scene::Point;

/// Creates gpu buffers.
pub trait GpuBackend {
    /// Buffer holding the points. Releases the gpu memory on drop.
    type PointBuffer;

    /// Buffer holding overlay vertices. Releases the gpu memory on drop.
    type OverlayBuffer;

    fn upload_points(&self, points: &[Point]) -> RendererResult<Self::PointBuffer>;

    fn upload_overlay(
        &self,
        vertices: &[OverlayVertex],
        primitive: OverlayPrimitive,
    ) -> RendererResult<Self::OverlayBuffer>;
}

/// All gpu buffers of one viewer.
pub struct BufferSet<B: GpuBackend> {
    points: Option<B::PointBuffer>,
    nr_points: usize,
    bounding_box: B::OverlayBuffer,
    axis: B::OverlayBuffer,
    legend: B::OverlayBuffer,
}

impl<B: GpuBackend> BufferSet<B> {
    /// Uploads the overlay geometry. The point buffer is created with the first call to
    /// [Self::replace_points].
    pub fn new(backend: &B, settings: &BaseRenderSettings) -> RendererResult<Self> {
        let bounding_box = backend.upload_overlay(
            &geometry::bounding_box_vertices(settings.bounding_box_color),
            OverlayPrimitive::Lines,
        )?;
        let axis = backend.upload_overlay(&geometry::axis_vertices(), OverlayPrimitive::Lines)?;
        let legend = backend.upload_overlay(
            &geometry::legend_vertices(&settings.color_map),
            OverlayPrimitive::Triangles,
        )?;
        Ok(BufferSet {
            points: None,
            nr_points: 0,
            bounding_box,
            axis,
            legend,
        })
    }

    /// Uploads the given points into a new buffer, which replaces the previous one.
    ///
    /// If the upload fails, the previous buffer is kept.
    pub fn replace_points(&mut self, backend: &B, points: &[Point]) -> RendererResult<()> {
        let buffer = backend.upload_points(points)?;
        self.points = Some(buffer);
        self.nr_points = points.len();
        Ok(())
    }

    pub fn points(&self) -> Option<&B::PointBuffer> {
        self.points.as_ref()
    }

    pub fn nr_points(&self) -> usize {
        self.nr_points
    }

    pub fn bounding_box(&self) -> &B::OverlayBuffer {
        &self.bounding_box
    }

    pub fn axis(&self) -> &B::OverlayBuffer {
        &self.axis
    }

    pub fn legend(&self) -> &B::OverlayBuffer {
        &self.legend
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Gpu backend for unit tests, that keeps track of all buffers instead of talking to a gpu.

    use super::GpuBackend;
    use crate::renderer::error::{RendererError, RendererResult};
    use crate::renderer::vertex_data::{OverlayPrimitive, OverlayVertex};
    use crate::scene::Point;
    use std::cell::{Cell, RefCell};
    use std::io;
    use std::rc::Rc;

    #[derive(Default, Debug)]
    pub struct BufferLog {
        pub created: Cell<usize>,
        pub released: Cell<usize>,
        pub released_ids: RefCell<Vec<usize>>,
    }

    impl BufferLog {
        pub fn alive(&self) -> usize {
            self.created.get() - self.released.get()
        }
    }

    #[derive(Debug)]
    pub struct MockBuffer {
        pub id: usize,
        pub len: usize,
        log: Rc<BufferLog>,
    }

    impl Drop for MockBuffer {
        fn drop(&mut self) {
            self.log.released.set(self.log.released.get() + 1);
            self.log.released_ids.borrow_mut().push(self.id);
        }
    }

    #[derive(Default, Clone)]
    pub struct MockBackend {
        pub log: Rc<BufferLog>,
        pub fail_uploads: Rc<Cell<bool>>,
    }

    impl MockBackend {
        fn create(&self, len: usize) -> RendererResult<MockBuffer> {
            if self.fail_uploads.get() {
                return Err(RendererError::Graphics {
                    source: Box::new(io::Error::new(io::ErrorKind::OutOfMemory, "mock")),
                });
            }
            let id = self.log.created.get();
            self.log.created.set(id + 1);
            Ok(MockBuffer {
                id,
                len,
                log: Rc::clone(&self.log),
            })
        }
    }

    impl GpuBackend for MockBackend {
        type PointBuffer = MockBuffer;
        type OverlayBuffer = MockBuffer;

        fn upload_points(&self, points: &[Point]) -> RendererResult<MockBuffer> {
            self.create(points.len())
        }

        fn upload_overlay(
            &self,
            vertices: &[OverlayVertex],
            _primitive: OverlayPrimitive,
        ) -> RendererResult<MockBuffer> {
            self.create(vertices.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BufferSet;
    use super::mock::MockBackend;
    use crate::renderer::settings::BaseRenderSettings;
    use crate::scene::Point;

    #[test]
    fn test_overlays_uploaded_once() {
        let backend = MockBackend::default();
        let buffers = BufferSet::new(&backend, &BaseRenderSettings::default()).unwrap();
        assert_eq!(backend.log.created.get(), 3);
        assert!(buffers.points().is_none());
        assert_eq!(buffers.bounding_box().len, 24);
        assert_eq!(buffers.axis().len, 6);
        drop(buffers);
        assert_eq!(backend.log.released.get(), 3);
    }

    #[test]
    fn test_replace_points_releases_previous_buffer() {
        let backend = MockBackend::default();
        let mut buffers = BufferSet::new(&backend, &BaseRenderSettings::default()).unwrap();
        let points = vec![Point::new([0.0; 3], Point::DEFAULT_COLOR); 10];
        buffers.replace_points(&backend, &points).unwrap();
        let first = buffers.points().unwrap().id;
        buffers.replace_points(&backend, &points[..4]).unwrap();
        assert_eq!(buffers.nr_points(), 4);
        assert_eq!(*backend.log.released_ids.borrow(), vec![first]);
        drop(buffers);
        assert_eq!(backend.log.created.get(), 5);
        assert_eq!(backend.log.alive(), 0);
    }

    #[test]
    fn test_failed_upload_keeps_previous_buffer() {
        let backend = MockBackend::default();
        let mut buffers = BufferSet::new(&backend, &BaseRenderSettings::default()).unwrap();
        let points = vec![Point::new([0.0; 3], Point::DEFAULT_COLOR); 3];
        buffers.replace_points(&backend, &points).unwrap();
        backend.fail_uploads.set(true);
        assert!(buffers.replace_points(&backend, &points[..1]).is_err());
        assert_eq!(buffers.nr_points(), 3);
        assert_eq!(buffers.points().unwrap().len, 3);
        assert_eq!(backend.log.released.get(), 0);
    }
}
