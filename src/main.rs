//! Prints one page of member search results as JSON.
//!
//! Criteria come from `SEARCH_*` environment variables (`SEARCH_USERNAME`,
//! `SEARCH_TEAM_NAME`, `SEARCH_AGE_GOE`, `SEARCH_AGE_LOE`, `SEARCH_PAGE`,
//! `SEARCH_SIZE`, `SEARCH_STRATEGY`); connection and page defaults from
//! [`AppConfig`].

use config::{Config, Environment};
use dotenvy::dotenv;
use serde::Deserialize;

use member_search::db::establish_connection_pool_with;
use member_search::models::config::AppConfig;
use member_search::repository::{DieselRepository, MemberSearchCondition};
use member_search::services::member::{SearchPageQuery, search_members_page};

#[derive(Debug, Default, Deserialize)]
struct SearchArgs {
    username: Option<String>,
    team_name: Option<String>,
    age_goe: Option<i32>,
    age_loe: Option<i32>,
    page: Option<i64>,
    size: Option<i64>,
    strategy: Option<member_search::pagination::PaginationStrategy>,
}

fn load_search_args() -> Result<SearchArgs, config::ConfigError> {
    Config::builder()
        .add_source(Environment::with_prefix("SEARCH").try_parsing(true))
        .build()?
        .try_deserialize()
}

fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let app_config = AppConfig::load().map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        std::io::Error::other(format!("Failed to load configuration: {e}"))
    })?;

    let args = load_search_args()
        .map_err(|e| std::io::Error::other(format!("Invalid search arguments: {e}")))?;

    let pool = establish_connection_pool_with(
        &app_config.database.url,
        (&app_config.database).into(),
    )
    .map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);

    let condition = MemberSearchCondition {
        username: args.username,
        team_name: args.team_name,
        age_goe: args.age_goe,
        age_loe: args.age_loe,
    };

    let query = SearchPageQuery {
        page: args.page,
        size: args.size,
        sort: None,
        strategy: args.strategy,
    };

    let page = search_members_page(&repo, &condition, query, &app_config.pagination)
        .map_err(|e| std::io::Error::other(format!("Search failed: {e}")))?;

    log::info!(
        "page {} of {} ({} total members)",
        page.pageable.page.saturating_add(1),
        page.total_pages().max(1),
        page.total_elements
    );

    let json = serde_json::to_string_pretty(&page)
        .map_err(|e| std::io::Error::other(format!("Failed to encode page: {e}")))?;
    println!("{json}");

    Ok(())
}
