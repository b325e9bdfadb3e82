//! Self-contained HTML rendering.
//!
//! The page inlines the SVG document, the graph data as
//! `<script type="application/json" id="graph-data">` and a small script
//! providing wheel zoom, drag pan and neighbour highlighting on click. It
//! loads nothing from the network.

use log::debug;

use super::{Exporter, RenderError, RenderFormat, RenderStyle, Scene, json::GraphData, svg::SvgExporter};

const PAGE_STYLE: &str = "\
html, body { margin: 0; height: 100%; }
body { font-family: Helvetica, Arial, sans-serif; overflow: hidden; }
svg.lexigraph { width: 100%; height: 100%; cursor: grab; }
svg.lexigraph.panning { cursor: grabbing; }
svg.lexigraph circle { cursor: pointer; }
svg.lexigraph .dimmed { opacity: 0.15; }
svg.lexigraph circle.selected { stroke: #222; stroke-width: 3; }";

const PAGE_SCRIPT: &str = r#"
(function () {
  const svg = document.querySelector("svg.lexigraph");
  if (!svg) { return; }
  const data = JSON.parse(document.getElementById("graph-data").textContent);
  const indexOf = new Map(data.nodes.map((n, i) => [n.id, String(i)]));
  const neighbours = new Map([...indexOf.values()].map((i) => [i, new Set([i])]));
  for (const e of data.edges) {
    const source = indexOf.get(e.source);
    const target = indexOf.get(e.target);
    neighbours.get(source).add(target);
    neighbours.get(target).add(source);
  }

  let box = svg.getAttribute("viewBox").split(" ").map(Number);
  const apply = () => svg.setAttribute("viewBox", box.join(" "));
  svg.removeAttribute("width");
  svg.removeAttribute("height");

  svg.addEventListener("wheel", (event) => {
    event.preventDefault();
    const factor = event.deltaY > 0 ? 1.1 : 1 / 1.1;
    const rect = svg.getBoundingClientRect();
    const fx = (event.clientX - rect.left) / rect.width;
    const fy = (event.clientY - rect.top) / rect.height;
    const [x, y, w, h] = box;
    box = [x + fx * w * (1 - factor), y + fy * h * (1 - factor), w * factor, h * factor];
    apply();
  }, { passive: false });

  let drag = null;
  svg.addEventListener("mousedown", (event) => {
    if (event.target.tagName === "circle") { return; }
    drag = { x: event.clientX, y: event.clientY, box: box.slice() };
    svg.classList.add("panning");
  });
  window.addEventListener("mousemove", (event) => {
    if (!drag) { return; }
    const rect = svg.getBoundingClientRect();
    const dx = (event.clientX - drag.x) * drag.box[2] / rect.width;
    const dy = (event.clientY - drag.y) * drag.box[3] / rect.height;
    box = [drag.box[0] - dx, drag.box[1] - dy, drag.box[2], drag.box[3]];
    apply();
  });
  window.addEventListener("mouseup", () => {
    drag = null;
    svg.classList.remove("panning");
  });

  let selected = null;
  const highlight = (node) => {
    selected = selected === node ? null : node;
    const keep = selected ? neighbours.get(selected) : null;
    svg.querySelectorAll("[data-node]").forEach((el) => {
      el.classList.toggle("dimmed", !!keep && !keep.has(el.dataset.node));
      el.classList.toggle("selected", el.dataset.node === selected && el.tagName === "circle");
    });
    svg.querySelectorAll("line[data-source]").forEach((el) => {
      const touches = el.dataset.source === selected || el.dataset.target === selected;
      el.classList.toggle("dimmed", !!keep && !touches);
    });
  };
  svg.querySelectorAll("circle[data-node]").forEach((el) => {
    el.addEventListener("click", () => highlight(el.dataset.node));
  });
})();
"#;

pub struct HtmlExporter<'a> {
    style: &'a RenderStyle,
}

impl<'a> HtmlExporter<'a> {
    pub fn new(style: &'a RenderStyle) -> Self {
        Self { style }
    }
}

impl Exporter for HtmlExporter<'_> {
    fn format(&self) -> RenderFormat {
        RenderFormat::Html
    }

    fn export(&self, scene: &Scene<'_>) -> Result<Vec<u8>, RenderError> {
        let svg = SvgExporter::new(self.style).document(scene).to_string();
        let data = escape_script(&serde_json::to_string(&GraphData::from_scene(scene))?);

        let mut page = String::with_capacity(svg.len() + data.len() + PAGE_SCRIPT.len() + 512);
        page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        page.push_str("<meta charset=\"utf-8\">\n<title>Lexigraph</title>\n");
        page.push_str("<style>\n");
        page.push_str(PAGE_STYLE);
        page.push_str("\n</style>\n</head>\n<body>\n");
        page.push_str(&svg);
        page.push_str("\n<script type=\"application/json\" id=\"graph-data\">");
        page.push_str(&data);
        page.push_str("</script>\n<script>");
        page.push_str(PAGE_SCRIPT);
        page.push_str("</script>\n</body>\n</html>\n");

        debug!(bytes = page.len(); "HTML page rendered");
        Ok(page.into_bytes())
    }
}

/// Makes JSON safe to embed inside a `<script>` element.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}
