use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::debug;
use std::path::PathBuf;

use devfolio::auth::{RegisterRequest, User};
use devfolio::badges::Badge;
use devfolio::blog::PostStatus;
use devfolio::config::ClientOptions;
use devfolio::pages::PageState;
use devfolio::portfolio::{SkillCategory, SkillForm};
use devfolio::profile::ProfileView;
use devfolio::resume::{self, ResumeSnapshot};
use devfolio::Devfolio;

const DEFAULT_TOKEN_FILE: &str = ".devfolio/tokens.json";
const DEFAULT_PREFS_FILE: &str = ".devfolio/prefs.json";

#[derive(Parser, Debug)]
#[clap(name = "devfolio", version)]
#[clap(about = "Manage a DevFolio portfolio from the command line", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// API base URL. Defaults to DEVFOLIO_API_URL or http://localhost:8000/api
    #[clap(long)]
    api_url: Option<String>,

    /// Token file. Defaults to DEVFOLIO_TOKEN_FILE or .devfolio/tokens.json
    #[clap(long)]
    token_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in with email and password
    Login {
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
    },
    /// Create an account and log in
    Register {
        #[clap(long)]
        email: String,
        #[clap(long)]
        username: String,
        #[clap(long)]
        password: String,
    },
    /// Log out and forget the stored tokens
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List skills, or add/delete one
    Skills {
        /// Name of a skill to add
        #[clap(long)]
        add: Option<String>,
        #[clap(long, default_value = "other")]
        category: String,
        #[clap(long)]
        proficiency: Option<u8>,
        /// Id of a skill to delete
        #[clap(long)]
        delete: Option<i64>,
    },
    /// List your projects
    Projects {
        /// Import repositories from GitHub first
        #[clap(long)]
        import: bool,
    },
    /// List your blog posts
    Posts,
    /// Publish a draft post
    Publish { slug: String },
    /// Move a post back to draft
    Unpublish { slug: String },
    /// Show the public profile of a user
    Profile { username: String },
    /// Write the HTML resume of a user
    Resume {
        username: String,
        /// Output directory
        #[clap(long, default_value = ".")]
        out: PathBuf,
    },
    /// Dashboard figures for the last 30 days
    Stats,
    /// Show or change the colour scheme: dark, light or toggle
    Theme { mode: Option<String> },
}

fn print_notices(state: &PageState) {
    for notice in state.notices() {
        if notice.is_error() {
            eprintln!("error: {}", notice.message);
        } else {
            println!("{}", notice.message);
        }
    }
}

fn parse_category(value: &str) -> anyhow::Result<SkillCategory> {
    SkillCategory::ALL
        .iter()
        .copied()
        .find(|c| c.as_str() == value)
        .with_context(|| format!("unknown skill category: {}", value))
}

async fn require_user(devfolio: &Devfolio) -> anyhow::Result<User> {
    match devfolio.auth().initialize().await? {
        Some(user) => Ok(user),
        None => bail!("Not logged in. Run `devfolio login` first."),
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut options = ClientOptions::from_env()?;
    if let Some(url) = &cli.api_url {
        options = options.with_api_url(url);
    }
    let token_file = cli
        .token_file
        .or_else(|| options.token_file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE));
    let prefs_file = options
        .prefs_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFS_FILE));
    options = options
        .with_token_file(Some(token_file))
        .with_prefs_file(Some(prefs_file));
    debug!("Using options {:?}", options);

    let devfolio = Devfolio::new(options)?;

    match cli.command {
        Commands::Login { email, password } => {
            let mut page = devfolio.auth_page();
            let signed_in = page.login(&email, &password).await;
            print_notices(page.state());
            if !signed_in {
                anyhow::bail!("login failed");
            }
        }
        Commands::Register {
            email,
            username,
            password,
        } => {
            let request = RegisterRequest::new(&email, &username, &password);
            let mut page = devfolio.auth_page();
            let registered = page.register(&request).await;
            print_notices(page.state());
            match page.user() {
                Some(user) if registered => println!("Welcome, {}!", user.display_name()),
                _ => anyhow::bail!("registration failed"),
            }
        }
        Commands::Logout => {
            let mut page = devfolio.auth_page();
            page.logout().await;
            print_notices(page.state());
        }
        Commands::Whoami => {
            let user = require_user(&devfolio).await?;
            println!("{} <{}>", user.display_name(), user.email);
        }
        Commands::Skills {
            add,
            category,
            proficiency,
            delete,
        } => {
            require_user(&devfolio).await?;
            let mut page = devfolio.skills_page();
            if let Some(name) = add {
                let mut form = SkillForm::new(&name, parse_category(&category)?);
                if let Some(proficiency) = proficiency {
                    form = form.with_proficiency(proficiency);
                }
                page.submit(&form, None).await;
            } else if let Some(id) = delete {
                page.delete(&id, true).await;
            } else {
                page.load().await;
            }
            print_notices(page.state());
            for skill in page.items() {
                println!(
                    "{:>5}  {:<24} {:<10} {:>3}%",
                    skill.id,
                    skill.name,
                    skill.category.label(),
                    skill.proficiency
                );
            }
        }
        Commands::Projects { import } => {
            let user = require_user(&devfolio).await?;
            let mut page = devfolio.projects_page(&user.username);
            if import {
                page.import_from_github().await;
            } else {
                page.load().await;
            }
            print_notices(page.state());
            for project in page.projects().items() {
                println!(
                    "{:<32} {:<12} {}",
                    project.slug,
                    project.status.label(),
                    project.tech_stack.join(", ")
                );
            }
        }
        Commands::Posts => {
            require_user(&devfolio).await?;
            let mut page = devfolio.blog_page();
            page.load().await;
            print_notices(page.state());
            for post in page.posts().items() {
                let status = match post.status {
                    PostStatus::Unknown => String::new(),
                    status => status.label(),
                };
                println!("{:<40} {:<10} {} views", post.slug, status, post.views_count);
            }
        }
        Commands::Publish { slug } => {
            require_user(&devfolio).await?;
            let mut page = devfolio.blog_page();
            page.publish(&slug).await;
            print_notices(page.state());
        }
        Commands::Unpublish { slug } => {
            require_user(&devfolio).await?;
            let mut page = devfolio.blog_page();
            page.unpublish(&slug).await;
            print_notices(page.state());
        }
        Commands::Profile { username } => {
            let mut profile = devfolio.public_profile();
            profile.load(&username).await;
            let data = match profile.view() {
                ProfileView::Ready(data) => data,
                _ => bail!("Portfolio not found"),
            };
            println!("{}", data.portfolio.title);
            if !data.portfolio.tagline.is_empty() {
                println!("{}", data.portfolio.tagline);
            }
            println!();
            for project in profile.visible_projects() {
                println!("* {}: {}", project.title, profile.project_text(project));
            }
            for post in profile.visible_posts() {
                println!("- {}: {}", post.title, profile.post_text(post));
            }
            if let Some(links) = profile.share_links() {
                println!();
                println!("Share: {}", links.copy);
            }
        }
        Commands::Resume { username, out } => {
            let mut profile = devfolio.public_profile();
            profile.load(&username).await;
            let data = profile.data().context("Portfolio not found")?;
            let document = resume::render(&ResumeSnapshot::from(data))?;
            let path = document.save_to(&out)?;
            println!("Wrote {}", path.display());
        }
        Commands::Stats => {
            let user = require_user(&devfolio).await?;
            let dashboard = devfolio.dashboard(&user.username).await;
            let stats = dashboard.stats;
            println!("Portfolio views: {}", stats.portfolio_views);
            println!("Unique visitors: {}", stats.unique_visitors);
            println!("Projects:        {}", stats.projects);
            println!("Blog posts:      {}", stats.blog_posts);
            for activity in dashboard.recent_activity {
                println!("  {}: {}", activity.title, activity.description);
            }
        }
        Commands::Theme { mode } => {
            let prefs = devfolio.prefs();
            let dark = match mode.as_deref() {
                None => prefs.dark_mode(),
                Some("dark") => {
                    prefs.set_dark_mode(true)?;
                    true
                }
                Some("light") => {
                    prefs.set_dark_mode(false)?;
                    false
                }
                Some("toggle") => prefs.toggle_dark_mode()?,
                Some(other) => bail!("unknown theme mode: {}", other),
            };
            println!("{}", if dark { "dark" } else { "light" });
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    if let Err(err) = run().await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
