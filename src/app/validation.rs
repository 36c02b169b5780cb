//! Shape checks run on raw request bodies before anything reaches the summarizer.

use serde_json::Value;

use super::ApiError;
use crate::article::ArticleInput;

#[derive(Debug)]
pub struct SingleArticleRequest {
    pub article: ArticleInput,
    pub word_limit: Option<String>,
}

#[derive(Debug)]
pub struct ArticleBatchRequest {
    pub articles: Vec<ArticleInput>,
    pub word_limit: Option<String>,
}

fn word_limit(body: &Value) -> Option<String> {
    body.get("wordLimit")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn to_article(value: &Value) -> Result<ArticleInput, ApiError> {
    serde_json::from_value(value.clone())
        .map_err(|e| ApiError::bad_request(format!("Invalid article: {}", e)))
}

/// `{ article: {...}, wordLimit? }`, where the article carries some content field.
pub fn validate_single_article(body: &Value) -> Result<SingleArticleRequest, ApiError> {
    let article = match body.get("article") {
        Some(value) if value.is_object() => to_article(value)?,
        _ => return Err(ApiError::bad_request("Article object is required in request body")),
    };

    if !article.has_content() {
        return Err(ApiError::bad_request(
            "Article must have a description field (description, sDescription, sContent, or content)",
        ));
    }

    Ok(SingleArticleRequest {
        article,
        word_limit: word_limit(body),
    })
}

/// `{ articles: [...], wordLimit? }` with 1..=`max_articles` entries, each titled and with content.
pub fn validate_article_batch(body: &Value, max_articles: usize) -> Result<ArticleBatchRequest, ApiError> {
    let entries = match body.get("articles") {
        None | Some(Value::Null) => {
            return Err(ApiError::bad_request("Articles array is required in request body"))
        }
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(ApiError::bad_request("Articles must be an array")),
    };

    if entries.is_empty() {
        return Err(ApiError::bad_request("Articles array cannot be empty"));
    }
    if entries.len() > max_articles {
        return Err(ApiError::bad_request(format!(
            "Cannot process more than {} articles at once",
            max_articles
        )));
    }

    let mut articles = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if !entry.is_object() {
            return Err(ApiError::bad_request(format!(
                "Article at index {} must be an object",
                index
            )));
        }
        let article = to_article(entry)?;
        if !article.has_title() {
            return Err(ApiError::bad_request(format!(
                "Article at index {} must have a valid title",
                index
            )));
        }
        if !article.has_content() {
            return Err(ApiError::bad_request(format!(
                "Article at index {} must have a valid description",
                index
            )));
        }
        articles.push(article);
    }

    Ok(ArticleBatchRequest {
        articles,
        word_limit: word_limit(body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn batch_error(body: Value) -> String {
        validate_article_batch(&body, 3).unwrap_err().message
    }

    #[test]
    fn test_batch_shape_errors() {
        assert_eq!(batch_error(json!({})), "Articles array is required in request body");
        assert_eq!(batch_error(json!({"articles": "nope"})), "Articles must be an array");
        assert_eq!(batch_error(json!({"articles": []})), "Articles array cannot be empty");
        assert_eq!(
            batch_error(json!({"articles": [{}, {}, {}, {}]})),
            "Cannot process more than 3 articles at once"
        );
        assert_eq!(
            batch_error(json!({"articles": [{"title": "T", "description": "D"}, 5]})),
            "Article at index 1 must be an object"
        );
        assert_eq!(
            batch_error(json!({"articles": [{"description": "D"}]})),
            "Article at index 0 must have a valid title"
        );
        assert_eq!(
            batch_error(json!({"articles": [{"sTitle": "T", "description": 12}]})),
            "Article at index 0 must have a valid description"
        );
    }

    #[test]
    fn test_batch_accepts_mixed_field_names() {
        let request = validate_article_batch(
            &json!({
                "articles": [
                    {"title": "A", "description": "a"},
                    {"sTitle": "B", "sContent": "b"}
                ],
                "wordLimit": "180-200"
            }),
            50,
        )
        .unwrap();
        assert_eq!(request.articles.len(), 2);
        assert_eq!(request.articles[1].s_content.as_deref(), Some("b"));
        assert_eq!(request.word_limit.as_deref(), Some("180-200"));
    }

    #[test]
    fn test_single_article() {
        let err = validate_single_article(&json!({"article": "text"})).unwrap_err();
        assert_eq!(err.message, "Article object is required in request body");

        let err = validate_single_article(&json!({"article": {"title": "only a title"}})).unwrap_err();
        assert!(err.message.starts_with("Article must have a description field"));

        let request = validate_single_article(&json!({"article": {"sContent": "body"}})).unwrap();
        assert_eq!(request.word_limit, None);
        assert!(request.article.has_content());
    }
}
