//! Dashboard JavaScript
//!
//! Draws every chart the server embedded as a JSON figure. Charts are
//! `<script type="application/json" class="chart-spec" data-target="...">`
//! blocks holding a Plotly `{data, layout}` object.

/// Plotly bundle loaded on pages that carry charts
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

pub const SCRIPT: &str = r"
(function () {
    var specs = document.querySelectorAll('script.chart-spec');
    specs.forEach(function (node) {
        var target = document.getElementById(node.dataset.target);
        if (!target) return;
        if (typeof Plotly === 'undefined') {
            target.textContent = 'Charts could not be loaded.';
            return;
        }
        try {
            var figure = JSON.parse(node.textContent);
            Plotly.newPlot(target, figure.data, figure.layout, {
                responsive: true,
                displayModeBar: false
            });
        } catch (e) {
            console.error('Chart render failed for ' + node.dataset.target, e);
            target.textContent = 'Chart unavailable.';
        }
    });
})();
";
