//! Dashboard CSS styles
//!
//! Shared by the landing page and the asset pages.
//! Uses CSS custom properties (variables) for theming.

pub const STYLES: &str = r"
* { box-sizing: border-box; margin: 0; padding: 0; }

:root {
    --bg: #0B0E11;
    --panel: #111318;
    --border: #1F2937;
    --text: #E5E7EB;
    --muted: #9CA3AF;
    --gold: #F0B90B;
    --gold-dark: #caa63d;
    --green: #3fb950;
    --red: #f85149;
    --blue: #58a6ff;
}

body {
    font-family: 'Inter', system-ui, -apple-system, 'Segoe UI', Roboto, sans-serif;
    background: var(--bg);
    color: var(--text);
    min-height: 100vh;
}

a { color: var(--gold); text-decoration: none; }
a:hover { text-decoration: underline; }

.container { max-width: 1200px; margin: 0 auto; padding: 24px 20px; }

h1, h2, h3, h4 { color: var(--text); font-weight: 600; }
h3 { margin-bottom: 12px; }

/* Landing */
.hero {
    text-align: center;
    padding: 48px 20px 24px;
}

.hero h1 {
    font-size: 2.3rem;
    font-weight: 800;
    color: var(--gold);
    text-shadow: 0 0 12px rgba(240, 185, 11, 0.4);
    margin-bottom: 8px;
}

.hero p { color: var(--gold-dark); font-size: 1.05rem; margin-bottom: 8px; }

.hero-desc {
    color: var(--muted);
    max-width: 760px;
    margin: 0 auto 12px;
    font-size: 0.95rem;
    line-height: 1.5;
}

.learn-btn {
    display: inline-block;
    background: var(--gold);
    color: #000 !important;
    padding: 10px 24px;
    font-weight: 700;
    border-radius: 6px;
    margin: 6px 0 16px;
}

.hero small {
    display: block;
    color: var(--gold-dark);
    margin-top: 40px;
    font-weight: 700;
    letter-spacing: 1px;
    font-size: 1.2rem;
    text-transform: uppercase;
}

.token-bar {
    display: flex;
    flex-wrap: wrap;
    justify-content: center;
    gap: 20px;
    padding: 20px 3%;
    background: rgba(17, 17, 17, 0.88);
    border-top: 1px solid #1c1c1c;
    border-bottom: 1px solid #1c1c1c;
}

.token {
    flex: 1 1 20%;
    max-width: 280px;
    text-align: center;
    padding: 12px 8px;
    border-radius: 10px;
    transition: all 0.3s ease;
}

.token:hover {
    background: rgba(240, 185, 11, 0.08);
    box-shadow: 0 0 16px rgba(240, 185, 11, 0.25);
    text-decoration: none;
}

.token h3 { color: var(--gold); font-size: 1rem; margin-bottom: 4px; }
.token p { color: var(--muted); font-size: 0.84rem; line-height: 1.3; }

.team {
    background-color: #0b0b0b;
    padding: 30px 20px;
    text-align: center;
    border-top: 1px solid #1c1c1c;
}

.team h3 { color: var(--gold); margin-bottom: 16px; }

.member-container {
    display: flex;
    justify-content: center;
    flex-wrap: wrap;
    gap: 20px;
}

.member { flex: 1 1 20%; max-width: 250px; }
.member p { color: var(--muted); font-size: 0.85rem; line-height: 1.3; }
.member p b { color: var(--text); }

/* Asset page */
.heading-yellow { color: var(--gold); font-size: 1.8rem; font-weight: 700; }
.caption { color: var(--muted); font-size: 0.85rem; margin-top: 4px; }
.back-link { display: inline-block; margin-bottom: 16px; font-size: 0.9rem; }

.divider { height: 1px; background: var(--border); margin: 2rem 0; }

.prediction-frame {
    width: 100%;
    height: 520px;
    border: 1px solid var(--border);
    border-radius: 12px;
    background: var(--panel);
}

.kpi-grid {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
    gap: 16px;
}

.kpi {
    background: var(--panel);
    border: 1px solid rgba(240, 185, 11, 0.25);
    border-radius: 14px;
    padding: 18px;
    text-align: center;
}

.kpi h3 { color: var(--muted); font-size: 0.9rem; margin-bottom: 4px; }
.kpi p { color: var(--text); font-weight: 700; font-size: 1.4rem; }
.kpi p.up { color: var(--green); }
.kpi p.down { color: var(--red); }

.chart { width: 100%; margin-bottom: 16px; }

.fundamentals p { margin-bottom: 6px; }
.fundamentals img { margin-bottom: 8px; }

.summary ul { margin: 8px 0 12px 20px; color: var(--muted); line-height: 1.6; }

/* Alerts */
.alert {
    padding: 12px 16px;
    border-radius: 8px;
    margin: 8px 0;
    font-size: 0.95rem;
}

.alert-info { background: rgba(88, 166, 255, 0.1); border: 1px solid rgba(88, 166, 255, 0.4); }
.alert-warning { background: rgba(240, 185, 11, 0.1); border: 1px solid rgba(240, 185, 11, 0.4); }
.alert-error { background: rgba(248, 81, 73, 0.1); border: 1px solid rgba(248, 81, 73, 0.4); }

@media (max-width: 768px) {
    .hero h1 { font-size: 1.6rem; }
    .token { flex: 1 1 45%; }
    .member { flex: 1 1 45%; }
}
";
