mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db, utils};

use auth::jwt::JwtService;
use repositories::sqlx_repo::{
    SqlxArticleRepo, SqlxDashboardRepo, SqlxFeedRepo, SqlxFriendRepo, SqlxProjectRepo,
    SqlxSlideRepo, SqlxTagRepo,
};
use use_cases::{
    articles::ArticleHandler,
    dashboard::DashboardHandler,
    feeds::{FeedHandler, FeedSettings},
    friends::FriendHandler,
    projects::ProjectHandler,
    slides::SlideHandler,
    tags::TagHandler,
};

pub struct AppState {
    pub token_service: JwtService,
    pub article_handler: AppArticleHandler,
    pub tag_handler: AppTagHandler,
    pub project_handler: AppProjectHandler,
    pub slide_handler: AppSlideHandler,
    pub friend_handler: AppFriendHandler,
    pub dashboard_handler: AppDashboardHandler,
    pub feed_handler: AppFeedHandler,
    pub db_pool: sqlx::PgPool,
}

pub type AppArticleHandler = ArticleHandler<SqlxArticleRepo>;
pub type AppTagHandler = TagHandler<SqlxTagRepo>;
pub type AppProjectHandler = ProjectHandler<SqlxProjectRepo>;
pub type AppSlideHandler = SlideHandler<SqlxSlideRepo>;
pub type AppFriendHandler = FriendHandler<SqlxFriendRepo>;
pub type AppDashboardHandler = DashboardHandler<SqlxDashboardRepo>;
pub type AppFeedHandler = FeedHandler<SqlxFeedRepo>;

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        AppState {
            token_service: JwtService::new(config),
            article_handler: ArticleHandler::new(SqlxArticleRepo::new(pool.clone())),
            tag_handler: TagHandler::new(SqlxTagRepo::new(pool.clone())),
            project_handler: ProjectHandler::new(SqlxProjectRepo::new(pool.clone())),
            slide_handler: SlideHandler::new(SqlxSlideRepo::new(pool.clone())),
            friend_handler: FriendHandler::new(SqlxFriendRepo::new(pool.clone())),
            dashboard_handler: DashboardHandler::new(SqlxDashboardRepo::new(pool.clone())),
            feed_handler: FeedHandler::new(
                SqlxFeedRepo::new(pool.clone()),
                FeedSettings::from(config),
            ),
            db_pool: pool,
        }
    }
}
