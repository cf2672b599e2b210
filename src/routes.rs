use axum::{
    routing::{get, post},
    Router,
};

use crate::{auth, follows, likes, posts, users, AppState};

pub fn router(state: AppState) -> Router {
    let auth_router = Router::new()
        .route("/sign-in", post(auth::handler::login))
        .route("/me", get(auth::handler::get_me));

    let user_router = Router::new()
        .route(
            "/",
            get(users::handler::list_users).post(users::handler::signup),
        )
        .route(
            "/:id",
            get(users::handler::get_user)
                .put(users::handler::update_user)
                .patch(users::handler::update_user)
                .delete(users::handler::delete_user),
        )
        .route("/:id/follow", post(follows::handler::follow_user))
        .route("/:id/followers", get(follows::handler::get_followers))
        .route("/:id/following", get(follows::handler::get_following))
        .route("/:id/is-following", get(follows::handler::check_following));

    let post_router = Router::new()
        .route(
            "/",
            get(posts::handler::list_posts).post(posts::handler::create_post),
        )
        .route("/feed", get(posts::handler::get_feed))
        .route(
            "/:id",
            get(posts::handler::get_post)
                .put(posts::handler::update_post)
                .patch(posts::handler::update_post)
                .delete(posts::handler::delete_post),
        )
        .route("/:id/like", post(likes::handler::toggle_post_like))
        .route("/:id/liked", get(likes::handler::like_status));

    let like_router = Router::new()
        .route(
            "/",
            get(likes::handler::list_likes).post(likes::handler::create_like),
        )
        .route("/:id", get(likes::handler::get_like));

    let follow_router = Router::new()
        .route(
            "/",
            get(follows::handler::list_follows).post(follows::handler::create_follow),
        )
        .route("/:id", get(follows::handler::get_follow));

    Router::new()
        .route("/", get(|| async { "Chirp API" }))
        .nest("/api/auth", auth_router)
        .nest("/api/users", user_router)
        .nest("/api/posts", post_router)
        .nest("/api/likes", like_router)
        .nest("/api/follows", follow_router)
        .with_state(state)
}
