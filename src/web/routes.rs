// src/web/routes.rs
use crate::{
    error::AppError,
    state::AppState,
    web::{
        auth_handlers, content_handlers, event_handlers, folder_handlers, mw_admin, mw_auth, mw_semester,
        qanda_handlers, quiz_handlers, semester_handlers, subject_handlers, user_handlers,
    },
};
use axum::{
    extract::DefaultBodyLimit,
    handler::Handler,
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;

// Margem para os campos de texto e cabeçalhos do multipart
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn create_router(app_state: AppState) -> Router {
    // Aplicado por método nas rotas que só um ADMIN pode usar
    let admin = middleware::from_fn_with_state(app_state.clone(), mw_admin::require_admin);
    let upload_limit = DefaultBodyLimit::max(app_state.config.max_upload_bytes + MULTIPART_OVERHEAD);

    // --- Rotas Públicas ---
    let public_routes = Router::new()
        .route("/auth/register", post(auth_handlers::register))
        .route("/auth/login", post(auth_handlers::login))
        .route("/auth/logout", post(auth_handlers::logout));

    // --- Rotas de conta (login, sem semestre) ---
    let account_routes = Router::new()
        .route("/users", get(user_handlers::list_users.layer(admin.clone())))
        .route("/users/me", get(user_handlers::me))
        .route("/users/me/semester", patch(user_handlers::select_semester))
        .route("/users/me/password", put(user_handlers::change_password))
        .route("/users/{id}", delete(user_handlers::delete_user.layer(admin.clone())))
        .route("/users/{id}/promote", put(user_handlers::promote_user.layer(admin.clone())))
        .route("/users/{id}/demote", put(user_handlers::demote_user.layer(admin.clone())))
        .route(
            "/semesters",
            get(semester_handlers::list_semesters).post(semester_handlers::create_semester.layer(admin.clone())),
        );

    // --- Rotas filtradas pelo semestre selecionado ---
    let scoped_routes = Router::new()
        .route("/users/contacts", get(user_handlers::list_contacts))
        .route(
            "/subjects",
            get(subject_handlers::list_subjects).post(subject_handlers::create_subject.layer(admin.clone())),
        )
        .route(
            "/folders",
            get(folder_handlers::list_folders).post(folder_handlers::create_folder.layer(admin.clone())),
        )
        .route(
            "/folders/{id}",
            get(folder_handlers::get_folder)
                .put(folder_handlers::rename_folder.layer(admin.clone()))
                .delete(folder_handlers::delete_folder.layer(admin.clone())),
        )
        .route(
            "/contents",
            post(content_handlers::upload_content.layer(admin.clone())).layer(upload_limit),
        )
        .route(
            "/contents/{id}",
            get(content_handlers::download_content)
                .put(content_handlers::rename_content.layer(admin.clone()))
                .delete(content_handlers::delete_content.layer(admin.clone())),
        )
        .route(
            "/quizzes",
            get(quiz_handlers::list_quizzes).post(quiz_handlers::create_quiz.layer(admin.clone())),
        )
        .route(
            "/quizzes/{id}",
            get(quiz_handlers::get_quiz)
                .put(quiz_handlers::rename_quiz.layer(admin.clone()))
                .delete(quiz_handlers::delete_quiz.layer(admin.clone())),
        )
        .route("/quizzes/{id}/answers", post(quiz_handlers::submit_answers))
        .route("/qanda", get(qanda_handlers::list_questions).post(qanda_handlers::create_question))
        .route(
            "/qanda/{id}",
            get(qanda_handlers::get_question).delete(qanda_handlers::delete_question),
        )
        .route("/qanda/{id}/answers", post(qanda_handlers::add_answer))
        .route("/qanda/{id}/answers/{answer_id}", delete(qanda_handlers::delete_answer))
        .route("/events", get(event_handlers::list_events).post(event_handlers::create_event))
        .route(
            "/events/{id}",
            get(event_handlers::get_event).delete(event_handlers::delete_event),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_semester::require_semester,
        ));

    // require_auth corre antes de require_semester e de require_admin
    let authenticated_routes = Router::new()
        .merge(account_routes)
        .merge(scoped_routes)
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_auth::require_auth,
        ));

    let api_routes = Router::new().merge(public_routes).merge(authenticated_routes);

    Router::new()
        .nest("/api", api_routes)
        .fallback(|| async { AppError::NotFound("Rota não encontrada.".into()) })
        // Depois do nest, para chegar também às rotas de /api
        .method_not_allowed_fallback(|| async { AppError::MethodNotAllowed })
        .with_state(app_state)
}

/// Router com as camadas de trace e cookies.
pub fn build_app(app_state: AppState) -> Router {
    create_router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CookieManagerLayer::new()),
    )
}

#[cfg(test)]
mod tests {
    use crate::web::test_support::spawn_app;
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn unknown_routes_answer_with_json() {
        let app = spawn_app().await;
        let res = app.request(Method::GET, "/api/nada", None, None).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(res.json()["error"], "Rota não encontrada.");
    }

    #[tokio::test]
    async fn wrong_methods_answer_with_json() {
        let app = spawn_app().await;
        let res = app.request(Method::PUT, "/api/events", None, None).await;
        assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.json()["error"], "Método não permitido para esta rota.");

        let res = app.request(Method::GET, "/api/auth/login", None, None).await;
        assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);
        assert!(res.json()["error"].is_string());
    }
}
