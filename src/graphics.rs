//! Kitty graphics protocol encoder
//!
//! Builds image-transmission and animation control sequences addressed
//! through named shared-memory segments. This layer never allocates, writes,
//! or frees the segments themselves: names are assumed to exist and to hold
//! packed 32-bit RGBA pixels of the declared size when the sequence is sent.
//!
//! Image handles are allocated monotonically and never validated or
//! recycled; a freed or never-allocated handle is undefined protocol
//! behavior at this layer.

use std::collections::HashMap;
use std::io::Write;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::codes;
use crate::Result;

/// Pixel dimensions of a bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// A pixel offset inside a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Handle of a transmitted image/animation, unique per encoder instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(u32);

impl ImageId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Encoder for the graphics protocol.
///
/// Owns the animation-handle counter and the shared-memory-name encoding
/// cache. The cache is unbounded; distinct segment names are few and
/// long-lived.
#[derive(Debug, Clone)]
pub struct GraphicsEncoder {
    next_id: u32,
    name_cache: HashMap<String, String>,
}

impl Default for GraphicsEncoder {
    fn default() -> Self {
        Self {
            next_id: 1,
            name_cache: HashMap::new(),
        }
    }
}

impl GraphicsEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn encoded_name(&mut self, name: &str) -> &str {
        self.name_cache
            .entry(name.to_owned())
            .or_insert_with(|| BASE64.encode(name))
    }

    fn next_image_id(&mut self) -> ImageId {
        let id = ImageId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Transmit a shared-memory RGBA bitmap with the given control fields
    /// appended after the fixed format/transport/size fields.
    fn shm_rgba<W: Write>(
        &mut self,
        out: &mut W,
        name: &str,
        size: Size,
        control: &str,
    ) -> Result<()> {
        let encoded = self.encoded_name(name);
        write!(
            out,
            "{}f=32,t=s,s={},v={},{};{}{}",
            codes::GFX,
            size.width,
            size.height,
            control,
            encoded,
            codes::ST,
        )?;
        out.flush()?;
        Ok(())
    }

    /// Transmit and display a bitmap without moving the cursor.
    ///
    /// `extra` is appended verbatim to the control data, letting callers add
    /// fields such as `i=<id>` or placement offsets.
    pub fn paint_bitmap<W: Write>(
        &mut self,
        out: &mut W,
        name: &str,
        size: Size,
        extra: Option<&str>,
    ) -> Result<()> {
        let control = match extra {
            Some(extra) => format!("a=T,C=1,{extra}"),
            None => "a=T,C=1".to_owned(),
        };
        self.shm_rgba(out, name, size, &control)
    }

    /// Allocate an animation handle, paint its first frame, and pause the
    /// animation there.
    pub fn paint_initial_frame<W: Write>(
        &mut self,
        out: &mut W,
        name: &str,
        size: Size,
    ) -> Result<ImageId> {
        let id = self.next_image_id();
        self.paint_bitmap(out, name, size, Some(&format!("i={id}")))?;
        // a=a animation control, c=1 pause on the first frame
        write!(out, "{}a=a,i={id},c=1{}", codes::GFX, codes::ST)?;
        out.flush()?;
        Ok(id)
    }

    /// Register frame `frame`'s pixel source under an existing handle.
    pub fn load_frame<W: Write>(
        &mut self,
        out: &mut W,
        id: ImageId,
        frame: u32,
        name: &str,
        size: Size,
    ) -> Result<()> {
        self.shm_rgba(out, name, size, &format!("a=f,i={id},r={frame}"))
    }

    /// Copy `size` pixels from a loaded source frame into a destination
    /// frame, replacing the destination pixels at `dest` (frame origin when
    /// `None`).
    pub fn composite_frame<W: Write>(
        &mut self,
        out: &mut W,
        id: ImageId,
        source_frame: u32,
        dest_frame: u32,
        size: Size,
        dest: Option<Point>,
    ) -> Result<()> {
        // C=1 requests source-copy compositing
        write!(
            out,
            "{}a=c,C=1,i={id},r={source_frame},c={dest_frame},w={},h={}",
            codes::GFX,
            size.width,
            size.height,
        )?;
        if let Some(point) = dest {
            write!(out, ",x={},y={}", point.x, point.y)?;
        }
        out.write_all(codes::ST.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Remove every on-screen placement, keeping transmitted image data.
    pub fn clear_placements<W: Write>(&mut self, out: &mut W) -> Result<()> {
        write!(out, "{}a=d{}", codes::GFX, codes::ST)?;
        out.flush()?;
        Ok(())
    }

    /// Release an image's placements and transmitted data.
    pub fn free_image<W: Write>(&mut self, out: &mut W, id: ImageId) -> Result<()> {
        write!(out, "{}a=d,d=I,i={id}{}", codes::GFX, codes::ST)?;
        out.flush()?;
        Ok(())
    }
}
