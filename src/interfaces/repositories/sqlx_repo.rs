use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxArticleRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxTagRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxProjectRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxSlideRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxFriendRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxDashboardRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxFeedRepo {
    pub pool: PgPool,
}
