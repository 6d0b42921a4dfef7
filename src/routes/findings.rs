//! Finding template catalog routes: templates, translations, and solutions.
//!
//! Every handler takes a [`RequestContext`], so authentication happens before
//! the transaction opens and nothing is committed unless the handler reaches
//! its success path. GET handlers render a view; POST handlers either redirect
//! back or re-render the form with errors.

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

use crate::errors::AppError;
use crate::forms::finding::{CreateFindingForm, FindingTemplateForm};
use crate::forms::solution::SolutionForm;
use crate::forms::translation::{language_choices, AddTranslationForm, TranslationForm};
use crate::forms::{Choice, FormErrors, FormView};
use crate::middleware::auth::CurrentUser;
use crate::middleware::context::RequestContext;
use crate::models::finding_template::{FindingTemplate, NewFindingTemplate};
use crate::models::language::Language;
use crate::services::finding_template::{self as finding_service, FindingTemplateDetails};
use crate::services::{solution as solution_service, translation as translation_service};
use crate::views::flash::{self, FlashCategory};
use crate::views::redirect::RedirectBack;
use crate::views::View;

const ROUTE_NAME: &str = "findings";

const LIST_TEMPLATE: &str = "findings/list.html";
const NEW_TEMPLATE: &str = "findings/new.html";
const DETAILS_TEMPLATE: &str = "findings/details.html";
const TRANSLATION_TEMPLATE: &str = "findings/edit_translation.html";
const SOLUTION_TEMPLATE: &str = "findings/edit_solution.html";

/// Fallback target for "back to the list".
pub const INDEX_PATH: &str = "/findings";

/// Fallback target for "back to the finding".
pub fn edit_path(finding_id: i64) -> String {
    format!("{INDEX_PATH}/{finding_id}")
}

#[derive(Debug, Serialize)]
struct ListContext {
    findings: Vec<FindingTemplate>,
}

#[derive(Debug, Serialize)]
struct NewContext {
    form: FormView<CreateFindingForm>,
}

#[derive(Debug, Serialize)]
struct DetailsContext {
    form: FormView<FindingTemplateForm>,
    finding: FindingTemplateDetails,
}

/// Context for the translation and solution pages, which hang off one finding.
#[derive(Debug, Serialize)]
struct ChildContext<F: Serialize> {
    form: FormView<F>,
    finding: FindingTemplate,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    lang_choices: Vec<Choice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lang: Option<Language>,
}

fn render<C: Serialize>(template: &'static str, context: C, jar: CookieJar) -> Response {
    View::new(ROUTE_NAME, template, context).render(jar)
}

fn render_invalid<C: Serialize>(template: &'static str, context: C, jar: CookieJar) -> Response {
    View::new(ROUTE_NAME, template, context).render_with_status(StatusCode::UNPROCESSABLE_ENTITY, jar)
}

fn all_languages_message(finding: &FindingTemplate) -> String {
    format!(
        "Finding {} already have all possible translations.",
        finding.name
    )
}

fn missing_language_message(lang: Language) -> String {
    format!("Language {lang} not created for this finding.")
}

// -- Finding templates --

/// GET /findings: list every finding template.
pub async fn index(mut ctx: RequestContext, jar: CookieJar) -> Result<Response, AppError> {
    let findings = finding_service::list(ctx.conn()).await?;
    ctx.commit().await?;
    Ok(render(LIST_TEMPLATE, ListContext { findings }, jar))
}

/// GET /findings/new: empty create form.
pub async fn new_form(_user: CurrentUser, jar: CookieJar) -> Response {
    let form = FormView::new(CreateFindingForm::default());
    render(NEW_TEMPLATE, NewContext { form }, jar)
}

/// POST /findings/new: create a finding template with its first translation.
pub async fn create(
    mut ctx: RequestContext,
    back: RedirectBack,
    jar: CookieJar,
    Form(form): Form<CreateFindingForm>,
) -> Result<Response, AppError> {
    let (fields, first) = match form.to_commands() {
        Ok(commands) => commands,
        Err(errors) => {
            let form = FormView::with_errors(form, errors);
            return Ok(render_invalid(NEW_TEMPLATE, NewContext { form }, jar));
        }
    };

    let new = NewFindingTemplate {
        creator: ctx.user.username.clone(),
        fields,
    };
    match finding_service::create(ctx.conn(), &new, &first).await {
        Ok(_) => {
            ctx.commit().await?;
            Ok(back.to(INDEX_PATH).into_response())
        }
        Err(AppError::Conflict(message)) => {
            let mut errors = FormErrors::default();
            errors.push("name", message);
            let form = FormView::with_errors(form, errors);
            Ok(render_invalid(NEW_TEMPLATE, NewContext { form }, jar))
        }
        Err(e) => Err(e),
    }
}

/// GET /findings/{finding_id}: details page with the edit form pre-filled.
pub async fn edit_form(
    mut ctx: RequestContext,
    Path(finding_id): Path<i64>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let finding = finding_service::details(ctx.conn(), finding_id).await?;
    ctx.commit().await?;

    let form = FormView::new(FindingTemplateForm::from(&finding.finding));
    Ok(render(DETAILS_TEMPLATE, DetailsContext { form, finding }, jar))
}

/// POST /findings/{finding_id}: apply the submitted attributes in place.
pub async fn update(
    mut ctx: RequestContext,
    Path(finding_id): Path<i64>,
    back: RedirectBack,
    jar: CookieJar,
    Form(form): Form<FindingTemplateForm>,
) -> Result<Response, AppError> {
    let finding = finding_service::details(ctx.conn(), finding_id).await?;

    let errors = match form.to_fields() {
        Ok(fields) => match finding_service::update(ctx.conn(), finding_id, &fields).await {
            Ok(_) => {
                ctx.commit().await?;
                return Ok(back.to(INDEX_PATH).into_response());
            }
            Err(AppError::Conflict(message)) => {
                let mut errors = FormErrors::default();
                errors.push("name", message);
                errors
            }
            Err(e) => return Err(e),
        },
        Err(errors) => errors,
    };

    let form = FormView::with_errors(form, errors);
    Ok(render_invalid(DETAILS_TEMPLATE, DetailsContext { form, finding }, jar))
}

/// POST /findings/{finding_id}/delete
pub async fn delete(
    mut ctx: RequestContext,
    Path(finding_id): Path<i64>,
    back: RedirectBack,
) -> Result<Response, AppError> {
    finding_service::delete(ctx.conn(), finding_id).await?;
    ctx.commit().await?;
    Ok(back.to(INDEX_PATH).into_response())
}

// -- Translations --

/// GET /findings/{finding_id}/add_translation
///
/// Offers only languages without a translation; when none are left the user
/// is sent back with a warning instead of a form.
pub async fn add_translation_form(
    mut ctx: RequestContext,
    Path(finding_id): Path<i64>,
    back: RedirectBack,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let finding = finding_service::find_by_id(ctx.conn(), finding_id).await?;
    ctx.commit().await?;

    let remaining = Language::remaining(&finding.langs);
    if remaining.is_empty() {
        let jar = flash::push(jar, FlashCategory::Warning, all_languages_message(&finding));
        return Ok((jar, back.to(INDEX_PATH)).into_response());
    }

    let context = ChildContext {
        form: FormView::new(AddTranslationForm::default()),
        finding,
        lang_choices: language_choices(&remaining),
        lang: None,
    };
    Ok(render(TRANSLATION_TEMPLATE, context, jar))
}

/// POST /findings/{finding_id}/add_translation
pub async fn add_translation(
    mut ctx: RequestContext,
    Path(finding_id): Path<i64>,
    back: RedirectBack,
    jar: CookieJar,
    Form(form): Form<AddTranslationForm>,
) -> Result<Response, AppError> {
    let finding = finding_service::find_by_id(ctx.conn(), finding_id).await?;

    let remaining = Language::remaining(&finding.langs);
    if remaining.is_empty() {
        let jar = flash::push(jar, FlashCategory::Warning, all_languages_message(&finding));
        return Ok((jar, back.to(INDEX_PATH)).into_response());
    }

    let new = match form.to_command() {
        Ok(new) => new,
        Err(errors) => {
            let context = ChildContext {
                form: FormView::with_errors(form, errors),
                finding,
                lang_choices: language_choices(&remaining),
                lang: None,
            };
            return Ok(render_invalid(TRANSLATION_TEMPLATE, context, jar));
        }
    };

    if finding.langs.contains(&new.lang) {
        let jar = flash::push(
            jar,
            FlashCategory::Danger,
            translation_service::duplicate_language(new.lang),
        );
        return Ok((jar, back.to(INDEX_PATH)).into_response());
    }

    match translation_service::create(ctx.conn(), finding_id, &new).await {
        Ok(_) => {
            ctx.commit().await?;
            Ok(back.to(INDEX_PATH).into_response())
        }
        Err(AppError::Conflict(message)) => {
            let jar = flash::push(jar, FlashCategory::Danger, message);
            Ok((jar, back.to(INDEX_PATH)).into_response())
        }
        Err(e) => Err(e),
    }
}

/// POST /findings/{finding_id}/delete/{language}
pub async fn delete_translation(
    mut ctx: RequestContext,
    Path((finding_id, lang)): Path<(i64, Language)>,
    back: RedirectBack,
) -> Result<Response, AppError> {
    translation_service::delete(ctx.conn(), finding_id, lang).await?;
    ctx.commit().await?;
    Ok(back.to(&edit_path(finding_id)).into_response())
}

/// GET /findings/{finding_id}/edit/{language}
pub async fn edit_translation_form(
    mut ctx: RequestContext,
    Path((finding_id, lang)): Path<(i64, Language)>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let finding = finding_service::find_by_id(ctx.conn(), finding_id).await?;
    let translation = translation_service::find(ctx.conn(), finding_id, lang).await?;
    ctx.commit().await?;

    let context = ChildContext {
        form: FormView::new(TranslationForm::from(&translation)),
        finding,
        lang_choices: Vec::new(),
        lang: Some(lang),
    };
    Ok(render(TRANSLATION_TEMPLATE, context, jar))
}

/// POST /findings/{finding_id}/edit/{language}
///
/// A language that is no longer translated sends the user back with a
/// `danger` flash rather than a 404.
pub async fn edit_translation(
    mut ctx: RequestContext,
    Path((finding_id, lang)): Path<(i64, Language)>,
    back: RedirectBack,
    jar: CookieJar,
    Form(form): Form<TranslationForm>,
) -> Result<Response, AppError> {
    let finding = finding_service::find_by_id(ctx.conn(), finding_id).await?;
    if !finding.langs.contains(&lang) {
        let jar = flash::push(jar, FlashCategory::Danger, missing_language_message(lang));
        return Ok((jar, back.to(&edit_path(finding_id))).into_response());
    }

    let text = match form.to_text() {
        Ok(text) => text,
        Err(errors) => {
            let context = ChildContext {
                form: FormView::with_errors(form, errors),
                finding,
                lang_choices: Vec::new(),
                lang: Some(lang),
            };
            return Ok(render_invalid(TRANSLATION_TEMPLATE, context, jar));
        }
    };

    match translation_service::update(ctx.conn(), finding_id, lang, &text).await {
        Ok(_) => {
            ctx.commit().await?;
            Ok(back.to(&edit_path(finding_id)).into_response())
        }
        // Deleted by a concurrent request after the language check.
        Err(e) if e.is_not_found() => {
            let jar = flash::push(jar, FlashCategory::Danger, missing_language_message(lang));
            Ok((jar, back.to(&edit_path(finding_id))).into_response())
        }
        Err(e) => Err(e),
    }
}

// -- Solutions --

/// GET /findings/{finding_id}/add_solution
pub async fn add_solution_form(
    mut ctx: RequestContext,
    Path(finding_id): Path<i64>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let finding = finding_service::find_by_id(ctx.conn(), finding_id).await?;
    ctx.commit().await?;

    let context = ChildContext {
        form: FormView::new(SolutionForm::default()),
        finding,
        lang_choices: language_choices(&Language::ALL),
        lang: None,
    };
    Ok(render(SOLUTION_TEMPLATE, context, jar))
}

/// POST /findings/{finding_id}/add_solution
///
/// A name already used by this finding comes back as an error on the `name`
/// field with the rest of the submission intact.
pub async fn add_solution(
    mut ctx: RequestContext,
    Path(finding_id): Path<i64>,
    back: RedirectBack,
    jar: CookieJar,
    Form(form): Form<SolutionForm>,
) -> Result<Response, AppError> {
    let finding = finding_service::find_by_id(ctx.conn(), finding_id).await?;

    let errors = match form.to_fields() {
        Ok(fields) => match solution_service::create(ctx.conn(), finding_id, &fields).await {
            Ok(_) => {
                ctx.commit().await?;
                return Ok(back.to(INDEX_PATH).into_response());
            }
            Err(AppError::Conflict(message)) => {
                let mut errors = FormErrors::default();
                errors.push("name", message);
                errors
            }
            Err(e) => return Err(e),
        },
        Err(errors) => errors,
    };

    let context = ChildContext {
        form: FormView::with_errors(form, errors),
        finding,
        lang_choices: language_choices(&Language::ALL),
        lang: None,
    };
    Ok(render_invalid(SOLUTION_TEMPLATE, context, jar))
}

/// POST /findings/{finding_id}/solution/{name}/delete
pub async fn delete_solution(
    mut ctx: RequestContext,
    Path((finding_id, name)): Path<(i64, String)>,
    back: RedirectBack,
) -> Result<Response, AppError> {
    solution_service::delete(ctx.conn(), finding_id, &name).await?;
    ctx.commit().await?;
    Ok(back.to(&edit_path(finding_id)).into_response())
}

/// GET /findings/{finding_id}/solution/{name}
pub async fn edit_solution_form(
    mut ctx: RequestContext,
    Path((finding_id, name)): Path<(i64, String)>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let finding = finding_service::find_by_id(ctx.conn(), finding_id).await?;
    let solution = solution_service::find(ctx.conn(), finding_id, &name).await?;
    ctx.commit().await?;

    let context = ChildContext {
        form: FormView::new(SolutionForm::from(&solution)),
        finding,
        lang_choices: language_choices(&Language::ALL),
        lang: None,
    };
    Ok(render(SOLUTION_TEMPLATE, context, jar))
}

/// POST /findings/{finding_id}/solution/{name}
pub async fn edit_solution(
    mut ctx: RequestContext,
    Path((finding_id, name)): Path<(i64, String)>,
    back: RedirectBack,
    jar: CookieJar,
    Form(form): Form<SolutionForm>,
) -> Result<Response, AppError> {
    let finding = finding_service::find_by_id(ctx.conn(), finding_id).await?;
    solution_service::find(ctx.conn(), finding_id, &name).await?;

    let errors = match form.to_fields() {
        Ok(fields) => match solution_service::update(ctx.conn(), finding_id, &name, &fields).await {
            Ok(_) => {
                ctx.commit().await?;
                return Ok(back.to(&edit_path(finding_id)).into_response());
            }
            Err(AppError::Conflict(message)) => {
                let mut errors = FormErrors::default();
                errors.push("name", message);
                errors
            }
            Err(e) => return Err(e),
        },
        Err(errors) => errors,
    };

    let context = ChildContext {
        form: FormView::with_errors(form, errors),
        finding,
        lang_choices: language_choices(&Language::ALL),
        lang: None,
    };
    Ok(render_invalid(SOLUTION_TEMPLATE, context, jar))
}
