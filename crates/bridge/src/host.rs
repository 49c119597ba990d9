use std::rc::Rc;

/// The two primitives the embedding host provides to guest code.
pub trait Host: 'static {
    /// Synchronous round trip.
    ///
    /// The host writes its reply into `response` and returns the number of
    /// bytes written, or a negative error code. A return larger than
    /// `response.len()` is treated as a host failure.
    fn call(&self, request: &[u8], response: &mut [u8]) -> i32;

    /// One-way log sink.
    fn log(&self, message: &[u8]);
}

impl<T: Host + ?Sized> Host for Rc<T> {
    fn call(&self, request: &[u8], response: &mut [u8]) -> i32 {
        (**self).call(request, response)
    }

    fn log(&self, message: &[u8]) {
        (**self).log(message);
    }
}

impl<T: Host + ?Sized> Host for Box<T> {
    fn call(&self, request: &[u8], response: &mut [u8]) -> i32 {
        (**self).call(request, response)
    }

    fn log(&self, message: &[u8]) {
        (**self).log(message);
    }
}
