/// Host-side buffer swap, invoked once per flip
///
/// Registered once by the host. `swap_buffers` blocks until the platform
/// has made the rendered frame visible and reports whether it did.
pub trait PresentCallback {
    fn swap_buffers(&mut self) -> bool;
}

impl<F: FnMut() -> bool> PresentCallback for F {
    fn swap_buffers(&mut self) -> bool {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_callback() {
        let mut calls = 0;
        {
            let mut callback = || {
                calls += 1;
                true
            };
            let callback: &mut dyn PresentCallback = &mut callback;
            assert!(callback.swap_buffers());
            assert!(callback.swap_buffers());
        }
        assert_eq!(calls, 2);
    }
}
