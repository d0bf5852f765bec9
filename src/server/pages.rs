//! HTML views for the upload form and the results page.

use crate::metrics::ClusterSummary;
use crate::pipeline::{ClusterParams, DEFAULT_EPS, DEFAULT_MIN_SAMPLES};
use crate::dataset::ColumnKind;
use base64::Engine;

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn upload_form() -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Noise Level Clustering</title></head>
<body>
  <h1>Noise Level Clustering</h1>
  <p>Upload a CSV with <code>Day</code> and <code>Night</code> columns.</p>
  <form method="post" action="/" enctype="multipart/form-data">
    <p><input type="file" name="file" accept=".csv"></p>
    <p><label>eps <input type="text" name="eps" value="{eps}"></label></p>
    <p><label>min_samples <input type="text" name="min_samples" value="{min_samples}"></label></p>
    <p><input type="submit" value="Cluster"></p>
  </form>
</body>
</html>
"#,
        eps = ColumnKind::Float.format(DEFAULT_EPS),
        min_samples = DEFAULT_MIN_SAMPLES,
    )
}

pub fn download_href(csv: &str) -> String {
    format!("/download?data={}", urlencoding::encode(csv))
}

pub fn results_page(summary: &ClusterSummary, params: &ClusterParams, png: &[u8], csv: &str) -> String {
    let plot = base64::engine::general_purpose::STANDARD.encode(png);

    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Clustering Results</title></head>
<body>
  <h1>Clustering Results</h1>
  <p>eps = {eps}, min_samples = {min_samples}</p>
  <ul>
    <li>Clusters found: {clusters}</li>
    <li>Noise points: {noise}</li>
  </ul>
  <img src="data:image/png;base64,{plot}" alt="DBSCAN clusters">
  <p><a href="{href}">Download clustered data</a> | <a href="/">Upload another file</a></p>
  <pre>{csv}</pre>
</body>
</html>
"#,
        eps = ColumnKind::Float.format(params.eps),
        min_samples = params.min_samples,
        clusters = summary.cluster_count,
        noise = summary.noise_count,
        href = escape_html(&download_href(csv)),
        csv = escape_html(csv),
    )
}
