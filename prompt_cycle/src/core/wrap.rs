//! Wraparound selection of a 1-based line index.

/// Position of a requested line after wrapping into `[1, total_lines]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSlot {
    /// 0-based offset into the line list.
    pub offset: usize,
    /// 1-based line number reported to the host.
    pub line_index: i64,
    /// True when the slot is the last line.
    pub is_last: bool,
}

/// Wrap a 1-based `line_index` into `[1, total_lines]`.
///
/// Zero and negative indices wrap from the end (`0` selects the last line).
/// Returns `None` when there are no lines.
pub fn wrap_line_index(line_index: impl Into<i128>, total_lines: usize) -> Option<LineSlot> {
    if total_lines == 0 {
        return None;
    }
    let line_index: i128 = line_index.into();
    let total = total_lines as i128;
    let offset = (line_index - 1).rem_euclid(total);
    let offset = usize::try_from(offset).ok()?;
    Some(LineSlot {
        offset,
        line_index: i64::try_from(offset + 1).ok()?,
        is_last: offset + 1 == total_lines,
    })
}
