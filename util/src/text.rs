use glam::{ivec2, IVec2};

pub trait StrExt {
    /// Width of the common leading whitespace of the non-empty lines.
    fn indentation(&self) -> usize;

    /// Return chars from a block of text mapped to their coordinates.
    ///
    /// Leading blank lines and common indentation are trimmed so that the
    /// result has minimum x and y coordinates at 0. Whitespace inside the
    /// block is kept, so the text can describe a full grid where space is a
    /// meaningful cell.
    fn char_grid(&self) -> impl Iterator<Item = (IVec2, char)> + '_;
}

impl StrExt for str {
    fn indentation(&self) -> usize {
        self.lines()
            .filter(|a| !a.trim().is_empty())
            .map(|a| a.chars().take_while(|c| c.is_whitespace()).count())
            .min()
            .unwrap_or(0)
    }

    fn char_grid(&self) -> impl Iterator<Item = (IVec2, char)> + '_ {
        let x_skip = self.indentation();

        self.trim_end()
            .lines()
            .skip_while(|a| a.trim().is_empty())
            .enumerate()
            .flat_map(move |(y, line)| {
                line.chars()
                    .skip(x_skip)
                    .enumerate()
                    .map(move |(x, c)| (ivec2(x as i32, y as i32), c))
            })
    }
}
