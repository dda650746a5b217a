//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::application::services::deploy::DeployReport;
use crate::application::services::project::ProjectSummary;
use crate::domain::ProjectDescriptor;
use crate::output::OutputContext;

/// Renders command results as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the outcome of a deployment.
    pub fn render_deploy(&self, descriptor: &ProjectDescriptor, report: &DeployReport) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.header(&descriptor.name);
        self.ctx.kv("Kind:     ", descriptor.kind.as_str());
        self.ctx.kv("Host:     ", &descriptor.host);
        self.ctx.kv("Unit:     ", &descriptor.primary_unit());
        self.ctx.kv("Directory:", &descriptor.remote_project_dir());
        self.ctx
            .kv("Steps:    ", &format!("{} completed", report.completed.len()));
    }

    /// Render the local project table.
    pub fn render_projects(&self, projects: &[ProjectSummary]) {
        if projects.is_empty() {
            self.ctx.info("No projects. Create one with: asyd new <server|job> <name>");
            return;
        }
        let width = projects.iter().map(|p| p.name.len()).max().unwrap_or(0);
        for p in projects {
            println!("{}", self.project_row(p, width));
        }
    }

    /// One line of the project table, with the name padded to `width`.
    pub(super) fn project_row(&self, p: &ProjectSummary, width: usize) -> String {
        let deployed = p
            .deployed_at
            .map_or_else(|| "never".to_string(), |t| t.format("%Y-%m-%d %H:%M UTC").to_string());
        format!(
            "  {:<width$}  {:<6}  {}  {}",
            p.name.style(self.ctx.styles.bold),
            p.kind.as_str(),
            p.host,
            deployed.style(self.ctx.styles.dim),
        )
    }

    /// Print filtered listing text verbatim.
    pub fn render_listing(&self, text: &str) {
        print!("{text}");
    }

    /// Print raw status text verbatim.
    pub fn render_status(&self, text: &str) {
        println!("{text}");
    }
}
