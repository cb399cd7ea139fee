use std::{io, sync::Arc};

use parking_lot::Mutex;

/// Shared byte sink. Clones append to the same buffer, so one handle can be
/// given to a [`crate::Runtime`] while another inspects what was emitted.
#[derive(Debug, Clone, Default)]
pub struct OutputCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl OutputCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<u8> {
        self.buffer.lock().clone()
    }

    pub fn get_string(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl io::Write for OutputCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn clones_share_the_buffer() {
        let capture = OutputCapture::new();
        let mut writer = capture.clone();
        writer.write_all(b"hi").unwrap();
        writer.write_all(&[b'!']).unwrap();
        assert_eq!(capture.contents(), b"hi!");
        assert_eq!(capture.get_string(), "hi!");
        capture.clear();
        assert!(capture.contents().is_empty());
    }
}
