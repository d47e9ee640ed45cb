use crate::error::SampleFault;
use image::{imageops, RgbaImage};
use std::sync::{Mutex, PoisonError};

/// Load progress of an image source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Decoding has not completed yet; the load signal has not fired.
    Pending,
    /// Pixel data is available.
    Loaded,
    /// The load signal fired with a failure, or the loader went away without
    /// ever firing.
    Failed,
}

/// The capability the extractor needs from an image: a source locator, load
/// progress, a one-shot wait for the load signal, and downsampling into an
/// RGBA working buffer.
///
/// Implementations decide how pixels are produced. [`DecodedSource`] serves
/// an already-decoded in-memory buffer; [`DeferredSource`] models a source
/// whose decoding finishes later and signals completion exactly once.
pub trait ImageSource {
    /// The source locator, or `None` when the source has nothing to load
    /// from. An empty locator is treated the same as a missing one.
    fn locator(&self) -> Option<&str>;

    fn load_state(&self) -> LoadState;

    /// Block until the one-shot load signal fires. Returns [`LoadState::Loaded`]
    /// or [`LoadState::Failed`], never [`LoadState::Pending`]. There is no
    /// timeout; the wait completes when the signal does.
    fn wait_loaded(&self) -> LoadState;

    /// Downsample the image into a `width`×`height` RGBA buffer. Raises a
    /// [`SampleFault`] when the backend refuses pixel access.
    fn sample(&self, width: u32, height: u32) -> Result<RgbaImage, SampleFault>;
}

impl<S: ImageSource + ?Sized> ImageSource for &S {
    fn locator(&self) -> Option<&str> {
        (**self).locator()
    }

    fn load_state(&self) -> LoadState {
        (**self).load_state()
    }

    fn wait_loaded(&self) -> LoadState {
        (**self).wait_loaded()
    }

    fn sample(&self, width: u32, height: u32) -> Result<RgbaImage, SampleFault> {
        (**self).sample(width, height)
    }
}

/// An image source backed by an already-decoded RGBA buffer. Always loaded;
/// sampling never faults.
#[derive(Debug, Clone)]
pub struct DecodedSource {
    locator: String,
    image: RgbaImage,
}

impl DecodedSource {
    pub fn new(locator: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            locator: locator.into(),
            image,
        }
    }
}

impl ImageSource for DecodedSource {
    fn locator(&self) -> Option<&str> {
        if self.locator.is_empty() {
            None
        } else {
            Some(&self.locator)
        }
    }

    fn load_state(&self) -> LoadState {
        LoadState::Loaded
    }

    fn wait_loaded(&self) -> LoadState {
        LoadState::Loaded
    }

    fn sample(&self, width: u32, height: u32) -> Result<RgbaImage, SampleFault> {
        Ok(imageops::resize(&self.image, width, height, imageops::FilterType::Nearest))
    }
}

enum Inner {
    Waiting(flume::Receiver<Option<RgbaImage>>),
    Ready(RgbaImage),
    Failed,
}

/// An image source whose pixel data arrives later through a one-shot load
/// signal, the analog of an image element with onload/onerror callbacks.
///
/// Created together with a [`LoadHandle`]; the loader fires the handle once
/// with either the decoded buffer or a failure. Dropping the handle without
/// firing counts as a load failure, so a waiting extraction resolves instead
/// of hanging on a loader that went away.
pub struct DeferredSource {
    locator: String,
    inner: Mutex<Inner>,
}

/// One-shot completion handle for a [`DeferredSource`]. Both signals consume
/// the handle; exactly one of them can ever fire.
pub struct LoadHandle {
    tx: flume::Sender<Option<RgbaImage>>,
}

impl DeferredSource {
    /// Create a pending source and the handle its loader fires on completion.
    pub fn pending(locator: impl Into<String>) -> (DeferredSource, LoadHandle) {
        let (tx, rx) = flume::bounded(1);

        let source = DeferredSource {
            locator: locator.into(),
            inner: Mutex::new(Inner::Waiting(rx)),
        };

        (source, LoadHandle { tx })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LoadHandle {
    /// Signal that decoding finished and hand over the pixel data.
    pub fn loaded(self, image: RgbaImage) {
        let _ = self.tx.send(Some(image));
    }

    /// Signal that loading failed.
    pub fn failed(self) {
        let _ = self.tx.send(None);
    }
}

impl ImageSource for DeferredSource {
    fn locator(&self) -> Option<&str> {
        if self.locator.is_empty() {
            None
        } else {
            Some(&self.locator)
        }
    }

    fn load_state(&self) -> LoadState {
        let mut inner = self.lock();

        let next = match &*inner {
            Inner::Waiting(rx) => match rx.try_recv() {
                Ok(Some(image)) => Some(Inner::Ready(image)),
                Ok(None) | Err(flume::TryRecvError::Disconnected) => Some(Inner::Failed),
                Err(flume::TryRecvError::Empty) => return LoadState::Pending,
            },
            _ => None,
        };

        if let Some(next) = next {
            *inner = next;
        }

        match &*inner {
            Inner::Ready(_) => LoadState::Loaded,
            _ => LoadState::Failed,
        }
    }

    fn wait_loaded(&self) -> LoadState {
        let mut inner = self.lock();

        let next = match &*inner {
            Inner::Waiting(rx) => match rx.recv() {
                Ok(Some(image)) => Some(Inner::Ready(image)),
                Ok(None) | Err(flume::RecvError::Disconnected) => Some(Inner::Failed),
            },
            _ => None,
        };

        if let Some(next) = next {
            *inner = next;
        }

        match &*inner {
            Inner::Ready(_) => LoadState::Loaded,
            _ => LoadState::Failed,
        }
    }

    fn sample(&self, width: u32, height: u32) -> Result<RgbaImage, SampleFault> {
        match &*self.lock() {
            Inner::Ready(image) => Ok(imageops::resize(image, width, height, imageops::FilterType::Nearest)),
            _ => Err(SampleFault::new("image is not loaded")),
        }
    }
}
