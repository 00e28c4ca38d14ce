// Pre-computed values for the templates. Geometry is already in SVG units.

#[derive(Debug, Clone, Default)]
pub struct ClusterSummary {
    pub id: String,
    pub api_server_url: String,
    pub node_count: usize,
    pub master_count: usize,
    pub pod_count: usize,
    pub refreshed: String,
}

#[derive(Debug, Clone, Default)]
pub struct ClusterView {
    pub id: String,
    pub api_server_url: String,
    pub width: f64,
    pub height: f64,
    pub opacity: f64,
    pub primary: String,
    pub secondary: String,
    pub nodes: Vec<NodeView>,
    pub unassigned: Vec<PodView>,
}

#[derive(Debug, Clone, Default)]
pub struct NodeView {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
    pub label_tooltip: String,
    pub resource_tooltip: String,
    pub gauge_rects: Vec<RectView>,
    pub pods: Vec<PodView>,
}

#[derive(Debug, Clone, Default)]
pub struct RectView {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub fill_opacity: f64,
    pub stroke: String,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PodView {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub fill: String,
    pub title: String,
}
