use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::{ErrorResponse, MessageResponse};
use crate::modules::auth::model::{
    CheckEmailRequest, CheckEmailResponse, ForgotPasswordRequest, LoginRequest, LoginResponse,
    LoginStatusResponse, ResendVerificationRequest, ResetPasswordRequest, SignupDto,
    VerifyEmailRequest,
};
use crate::modules::blogs::model::{
    Blog, BlogListResponse, BlogWithAuthor, CreateBlogDto, UpdateBlogDto,
};
use crate::modules::files::model::{FileListResponse, FileRecord, FileUrlResponse, UploadFileDto};
use crate::modules::users::model::{ChangePasswordDto, UpdateProfileDto, UserResponse};
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::signup,
        crate::modules::auth::controller::check_email,
        crate::modules::auth::controller::check_login_status,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::verify_email,
        crate::modules::auth::controller::resend_verification,
        crate::modules::auth::controller::forgot_password,
        crate::modules::auth::controller::reset_password,
        crate::modules::users::controller::get_me,
        crate::modules::users::controller::update_me,
        crate::modules::users::controller::change_password,
        crate::modules::blogs::controller::create_blog,
        crate::modules::blogs::controller::list_blogs,
        crate::modules::blogs::controller::get_blog,
        crate::modules::blogs::controller::update_blog,
        crate::modules::blogs::controller::delete_blog,
        crate::modules::files::controller::upload_file,
        crate::modules::files::controller::list_files,
        crate::modules::files::controller::get_file_url,
        crate::modules::files::controller::delete_file,
    ),
    components(
        schemas(
            SignupDto,
            LoginRequest,
            LoginResponse,
            CheckEmailRequest,
            CheckEmailResponse,
            LoginStatusResponse,
            VerifyEmailRequest,
            ResendVerificationRequest,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            MessageResponse,
            ErrorResponse,
            UserResponse,
            UpdateProfileDto,
            ChangePasswordDto,
            Blog,
            BlogWithAuthor,
            BlogListResponse,
            CreateBlogDto,
            UpdateBlogDto,
            FileRecord,
            FileListResponse,
            FileUrlResponse,
            UploadFileDto,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Signup, login, email verification, and password reset"),
        (name = "Users", description = "Profile management endpoints"),
        (name = "Blogs", description = "Blog post endpoints"),
        (name = "Files", description = "File upload and management endpoints")
    ),
    info(
        title = "Saasbase API",
        version = "0.1.0",
        description = "SaaS starter backend built with Rust, Axum, and PostgreSQL featuring JWT-based authentication, email verification, blogs, and file uploads.",
        contact(
            name = "API Support",
            email = "support@saasbase.dev"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
