//! ASCII rendering.
//!
//! This is an approximation. Positions are scaled from their bounding box
//! onto a fixed character grid, so nearby nodes may share a cell and long
//! edges lose their exact slope. Edges are drawn as `.`, original nodes as
//! `O` and semantic nodes as `*`. A label is written to the right of its node
//! only when every cell it needs is free. Each grid row is exactly
//! `ascii_columns` characters wide.

use log::debug;

use lexigraph_core::{geometry::Point, graph::Origin};

use super::{Exporter, RenderError, RenderFormat, RenderStyle, Scene};

const EDGE: char = '.';
const ORIGINAL_NODE: char = 'O';
const SEMANTIC_NODE: char = '*';
const EMPTY: char = ' ';

pub struct AsciiExporter<'a> {
    style: &'a RenderStyle,
}

impl<'a> AsciiExporter<'a> {
    pub fn new(style: &'a RenderStyle) -> Self {
        Self { style }
    }
}

/// Character grid with a per-cell flag for cells that must not be overwritten.
struct Grid {
    columns: usize,
    rows: usize,
    cells: Vec<char>,
    reserved: Vec<bool>,
}

impl Grid {
    fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![EMPTY; columns * rows],
            reserved: vec![false; columns * rows],
        }
    }

    fn index(&self, col: usize, row: usize) -> usize {
        row * self.columns + col
    }

    /// Bresenham line between two cells, leaving reserved cells untouched.
    fn line(&mut self, from: (usize, usize), to: (usize, usize)) {
        let (mut x, mut y) = (from.0 as i64, from.1 as i64);
        let (x1, y1) = (to.0 as i64, to.1 as i64);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            let i = self.index(x as usize, y as usize);
            if !self.reserved[i] {
                self.cells[i] = EDGE;
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn mark(&mut self, (col, row): (usize, usize), symbol: char) {
        let i = self.index(col, row);
        self.cells[i] = symbol;
        self.reserved[i] = true;
    }

    /// Writes `label` starting at `(col, row)` if it fits without touching a
    /// reserved cell.
    fn label(&mut self, (col, row): (usize, usize), label: &str) -> bool {
        let len = label.chars().count();
        if len == 0 || col + len > self.columns || label.chars().any(char::is_control) {
            return false;
        }
        let start = self.index(col, row);
        if self.reserved[start..start + len].iter().any(|&taken| taken) {
            return false;
        }
        for (offset, ch) in label.chars().enumerate() {
            self.cells[start + offset] = ch;
            self.reserved[start + offset] = true;
        }
        true
    }

    fn into_text(self) -> String {
        let mut out = String::with_capacity((self.columns + 1) * self.rows);
        for row in self.cells.chunks(self.columns) {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}

/// Maps points from a bounding box onto grid cells.
struct Projection {
    min: Point,
    span: Point,
    columns: usize,
    rows: usize,
}

impl Projection {
    fn new((min, max): (Point, Point), columns: usize, rows: usize) -> Self {
        Self {
            min,
            span: max.sub_point(min),
            columns,
            rows,
        }
    }

    fn cell(&self, point: Point) -> (usize, usize) {
        (
            scale_axis(point.x() - self.min.x(), self.span.x(), self.columns),
            scale_axis(point.y() - self.min.y(), self.span.y(), self.rows),
        )
    }
}

fn scale_axis(offset: f64, span: f64, cells: usize) -> usize {
    let last = cells.saturating_sub(1);
    if span <= f64::EPSILON || !offset.is_finite() {
        return last / 2;
    }
    let scaled = (offset / span * last as f64).round();
    (scaled.max(0.0) as usize).min(last)
}

impl Exporter for AsciiExporter<'_> {
    fn format(&self) -> RenderFormat {
        RenderFormat::Ascii
    }

    fn export(&self, scene: &Scene<'_>) -> Result<Vec<u8>, RenderError> {
        let columns = self.style.ascii_columns().max(1);
        let rows = self.style.ascii_rows().max(1);
        let mut grid = Grid::new(columns, rows);

        let Some(bounds) = scene.bounds() else {
            return Ok(grid.into_text().into_bytes());
        };
        let projection = Projection::new(bounds, columns, rows);

        let nodes: Vec<_> = scene
            .nodes()
            .map(|(node, point)| (node, projection.cell(point)))
            .collect();

        // Node cells are reserved first so edges never overwrite them.
        for (node, cell) in &nodes {
            let symbol = match node.origin() {
                Origin::Original => ORIGINAL_NODE,
                Origin::Semantic => SEMANTIC_NODE,
            };
            grid.mark(*cell, symbol);
        }
        for (_, source, target) in scene.edges() {
            grid.line(projection.cell(source), projection.cell(target));
        }

        let mut placed = 0;
        for (node, (col, row)) in &nodes {
            if grid.label((col + 1, *row), node.label()) {
                placed += 1;
            }
        }

        debug!(columns = columns, rows = rows, labels = placed; "ASCII grid rendered");
        Ok(grid.into_text().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use lexigraph_core::graph::{Edge, Graph, Node, RelationType};

    use super::*;
    use crate::{export::test_support::triangle, layout::Positions};

    fn render(style: &RenderStyle) -> String {
        let (graph, positions) = triangle();
        let scene = Scene::new(&graph, &positions).unwrap();
        String::from_utf8(AsciiExporter::new(style).export(&scene).unwrap()).unwrap()
    }

    #[test]
    fn test_grid_has_fixed_size() {
        let text = render(&RenderStyle::default());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 24);
        assert!(lines.iter().all(|line| line.chars().count() == 80));
    }

    #[test]
    fn test_node_markers_and_edges() {
        let text = render(&RenderStyle::default());

        assert_eq!(text.matches(ORIGINAL_NODE).count(), 2);
        assert!(text.contains(SEMANTIC_NODE));
        assert!(text.contains(EDGE));
    }

    #[test]
    fn test_corners_follow_bounds() {
        let text = render(&RenderStyle::default());
        let lines: Vec<&str> = text.lines().collect();

        // game is top-left, activity top-right and news bottom row.
        assert!(lines[0].starts_with("OGame"));
        assert!(lines[0].ends_with('*'));
        assert!(lines[23].contains(ORIGINAL_NODE));
    }

    #[test]
    fn test_labels_are_dropped_when_they_do_not_fit() {
        let text = render(&RenderStyle::default());
        // activity sits in the last column, so there is no room for its label.
        assert!(!text.contains("activity"));
        assert!(text.contains("news"));
    }

    #[test]
    fn test_multi_line_label_keeps_grid_shape() {
        let graph = Graph::from_parts(
            vec![
                Node::original("game", "game", 1.0),
                Node::semantic("board\ngame"),
            ],
            vec![Edge::new("game", "board game", 1.0, RelationType::IsA)],
        )
        .unwrap();
        let points: IndexMap<String, Point> = [
            ("game".to_string(), Point::new(600.0, 400.0)),
            ("board game".to_string(), Point::new(0.0, 0.0)),
        ]
        .into_iter()
        .collect();
        let positions = Positions::new(points, 0);
        let style = RenderStyle::default();
        let scene = Scene::new(&graph, &positions).unwrap();

        let text = String::from_utf8(AsciiExporter::new(&style).export(&scene).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 24);
        assert!(lines.iter().all(|line| line.chars().count() == 80));
        assert!(lines[0].starts_with("*board game"));
    }

    #[test]
    fn test_grid_rejects_control_characters() {
        let mut grid = Grid::new(10, 2);
        assert!(!grid.label((0, 0), "a\nb"));
        assert!(grid.label((0, 0), "ab"));
        assert_eq!(grid.into_text(), "ab        \n          \n");
    }

    #[test]
    fn test_tiny_grid() {
        let style = RenderStyle::default().with_ascii_grid(1, 1);
        let text = render(&style);
        assert_eq!(text.lines().count(), 1);
        assert_eq!(text.lines().next().unwrap().chars().count(), 1);
    }

    #[test]
    fn test_scale_axis_centres_degenerate_span() {
        assert_eq!(scale_axis(0.0, 0.0, 80), 39);
        assert_eq!(scale_axis(5.0, 10.0, 11), 5);
        assert_eq!(scale_axis(10.0, 10.0, 80), 79);
    }
}
