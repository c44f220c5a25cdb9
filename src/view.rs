use engine::prelude::*;

/// Draw the level with actors on top.
pub fn render(r: &impl AsRef<Runtime>) -> String {
    let r = r.as_ref();
    draw(r.terrain(), |p| {
        let id = r.actor_at(p)?;
        Some(r.actor(id)?.glyph())
    })
}

/// Draw the last digit of every cell's distance from the player.
pub fn distance_overlay(
    r: &impl AsRef<Runtime>,
    tunneling: bool,
) -> String {
    let r = r.as_ref();
    let maps = r.maps();
    draw(r.terrain(), |p| {
        if Some(p) == maps.source() {
            return Some('@');
        }
        match maps.get(p, tunneling) {
            UNREACHABLE => Some(' '),
            d => char::from_digit(d % 10, 10),
        }
    })
}

fn draw(terrain: &Terrain, overlay: impl Fn(IVec2) -> Option<char>) -> String {
    let mut ret = String::new();
    for y in 0..terrain.height() {
        for x in 0..terrain.width() {
            let p = ivec2(x, y);
            let c = overlay(p).unwrap_or_else(|| {
                terrain.cell(p).map_or(' ', |c| c.kind.into())
            });
            ret.push(c);
        }
        ret.push('\n');
    }
    ret
}

#[cfg(test)]
mod test {
    use super::*;

    fn lines(s: &str) -> Vec<&str> {
        s.lines().map(str::trim_end).collect()
    }

    #[test]
    fn drawing() {
        let t = Terrain::from_ascii(
            "
            +----+
            -...@-
            +----+",
        )
        .unwrap();
        let player = t.find(CellKind::Player).unwrap();
        let mut r = Runtime::new(t, player, 1).unwrap();
        r.spawn_monster(ivec2(1, 1), 10, Caps::TUNNELING | Caps::INTELLIGENT)
            .unwrap();

        assert_eq!(lines(&render(&r)), vec!["+----+", "-5..@-", "+----+"]);
        assert_eq!(
            lines(&distance_overlay(&r, false)),
            vec!["", " 321@", ""]
        );
        assert_eq!(
            lines(&distance_overlay(&r, true)),
            vec!["654333", "6321@3", "654333"]
        );
    }
}
