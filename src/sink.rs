//! Output sinks for sampled frames.
//!
//! A sink puts each finished [`AsciiFrame`] where the user looks: the
//! terminal on native builds, a DOM element on the web. Sinks are
//! deliberately dumb; sampling cadence and layout are the viewer's
//! business.

use crate::ascii::AsciiFrame;

pub trait AsciiSink {
    fn present(&mut self, frame: &AsciiFrame) -> anyhow::Result<()>;
}

#[cfg(not(target_arch = "wasm32"))]
pub use terminal::TerminalSink;

#[cfg(not(target_arch = "wasm32"))]
mod terminal {
    use std::io::{Stdout, Write, stdout};

    use crossterm::{
        QueueableCommand, cursor,
        style::Print,
        terminal::{Clear, ClearType},
    };

    use super::AsciiSink;
    use crate::ascii::AsciiFrame;

    /// Repaints the frame in place from the top-left terminal cell. The
    /// cursor stays hidden while the sink lives and comes back on drop.
    pub struct TerminalSink {
        out: Stdout,
    }

    impl TerminalSink {
        pub fn new() -> anyhow::Result<Self> {
            let mut out = stdout();
            out.queue(cursor::Hide)?;
            out.queue(Clear(ClearType::All))?;
            out.flush()?;
            Ok(Self { out })
        }
    }

    impl AsciiSink for TerminalSink {
        fn present(&mut self, frame: &AsciiFrame) -> anyhow::Result<()> {
            self.out.queue(cursor::MoveTo(0, 0))?;
            for line in frame.lines() {
                self.out.queue(Print(line))?;
                self.out.queue(cursor::MoveToNextLine(1))?;
            }
            // Drop leftovers from an earlier, taller frame.
            self.out.queue(Clear(ClearType::FromCursorDown))?;
            self.out.flush()?;
            Ok(())
        }
    }

    impl Drop for TerminalSink {
        fn drop(&mut self) {
            let _ = self.out.queue(cursor::Show);
            let _ = self.out.flush();
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::DomSink;

#[cfg(target_arch = "wasm32")]
mod dom {
    use anyhow::Context as _;

    use super::AsciiSink;
    use crate::ascii::AsciiFrame;

    /// Writes each frame into a DOM element's text content. The element
    /// should use a monospace font with a tight line height.
    #[derive(Clone, Debug)]
    pub struct DomSink {
        element: web_sys::Element,
    }

    impl DomSink {
        /// Bind to the element with the given id, creating a `<pre>` under
        /// `<body>` when it does not exist yet.
        pub fn attach(element_id: &str) -> anyhow::Result<Self> {
            let document = web_sys::window()
                .and_then(|w| w.document())
                .context("no document to attach to")?;
            let element = match document.get_element_by_id(element_id) {
                Some(element) => element,
                None => {
                    let element = document
                        .create_element("pre")
                        .map_err(|e| anyhow::anyhow!("creating output element: {e:?}"))?;
                    element.set_id(element_id);
                    document
                        .body()
                        .context("no body to attach to")?
                        .append_child(&element)
                        .map_err(|e| anyhow::anyhow!("attaching output element: {e:?}"))?;
                    element
                }
            };
            Ok(Self { element })
        }
    }

    impl AsciiSink for DomSink {
        fn present(&mut self, frame: &AsciiFrame) -> anyhow::Result<()> {
            self.element.set_text_content(Some(frame.text()));
            Ok(())
        }
    }
}
