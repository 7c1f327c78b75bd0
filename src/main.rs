use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use newsdesk::api::{ApiClient, Paging};
use newsdesk::config::Config;
use newsdesk::news::{
    open_article, ArticleKey, ArticleListFetcher, CategoryFilter, ListRequest, LookupError,
    NewsStore, NormalizeOptions, Shelf, ViewCounter,
};
use newsdesk::render;

#[derive(Parser, Debug)]
#[command(name = "newsdesk", version, about = "Read the news portal from the terminal")]
struct Args {
    /// Config file (default: ~/.config/newsdesk/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Headlines plus the landing category sections
    Home,

    /// One category, paginated
    Category {
        /// Category name, or its URL slug with --slug
        name: String,

        /// Page to show (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Treat NAME as a URL slug such as `arts-culture`
        #[arg(long)]
        slug: bool,

        /// Ask the API for one page instead of paging locally
        #[arg(long)]
        server_paging: bool,
    },

    /// Read one article and record a view
    Article {
        /// Article slug, or its id with --id
        key: String,

        /// Fail when several articles share the slug
        #[arg(long)]
        strict: bool,

        /// Treat KEY as an article id
        #[arg(long)]
        id: bool,
    },

    /// List every category the API knows
    Categories,

    /// Record one view and print the new count
    View { id: String },
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => match Config::default_path() {
            Some(path) => Config::load(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => {
                tracing::debug!("HOME not set, using default configuration");
                Config::default()
            }
        },
    };
    config
        .with_env_overrides()
        .context("Invalid environment override")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    let client = ApiClient::new(config.api_url()?, config.request_timeout())
        .context("Failed to build HTTP client")?;
    let fetcher = ArticleListFetcher::new(client.clone(), NormalizeOptions::from(&config));
    let counter = ViewCounter::new(client);
    let mut store = NewsStore::new();

    let page = match args.command {
        Command::Home => {
            let report = fetcher
                .load_home(
                    &mut store,
                    config.headline_limit,
                    config.category_limit,
                    &config.landing_categories,
                )
                .await;
            render::home_page(&store, &report)
        }

        Command::Category {
            name,
            page,
            slug,
            server_paging,
        } => {
            let filter = if slug {
                CategoryFilter::Slug(name.clone())
            } else {
                CategoryFilter::Exact(name.clone())
            };
            let paging = if server_paging {
                Paging::Page {
                    page,
                    limit: config.page_size,
                }
            } else {
                Paging::All
            };
            let list = fetcher
                .fetch(&ListRequest::all().with_category(filter).with_paging(paging))
                .await;
            let paginator = list.paginator(config.page_size, page);

            // A server page already is the visible slice
            let visible = if server_paging {
                list.articles.clone()
            } else {
                paginator.slice(&list.articles).to_vec()
            };
            let heading = match (slug, list.articles.first()) {
                (true, Some(first)) => first.category.clone(),
                _ => name,
            };
            store.insert_shelf(Shelf::Primary, visible);

            let articles: Vec<_> = store.shelf(&Shelf::Primary).into_iter().cloned().collect();
            render::listing_page(
                &heading,
                &articles,
                &paginator,
                list.error.as_ref(),
                "No articles found in this category yet.",
            )
        }

        Command::Article { key, strict, id } => {
            let lookup = if id {
                ArticleKey::Id(key.clone())
            } else {
                ArticleKey::Slug {
                    slug: key.clone(),
                    strict,
                }
            };

            match open_article(&fetcher, &counter, &mut store, &lookup, config.related_limit).await
            {
                Ok(detail) => render::article_page(&detail),
                Err(LookupError::NotFound(what)) => render::not_found_page(&what),
                Err(e @ LookupError::Ambiguous { .. }) => {
                    return Err(e).context("Several articles share this slug; look it up with --id")
                }
                Err(e) => render::article_error_page(&key, &e),
            }
        }

        Command::Categories => {
            let list = fetcher.fetch_categories().await;
            render::category_index(&list.names, list.error.as_ref())
        }

        Command::View { id } => match counter.increment(&id).await {
            Some(increment) => format!("{}: {} views\n", increment.article_id, increment.views),
            None => anyhow::bail!("Failed to record view for {id}"),
        },
    };

    print!("{page}");
    Ok(())
}
