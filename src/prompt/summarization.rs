use super::common::{JSON_ONLY_ENGLISH, JSON_ONLY_HINDI, PARAPHRASE_ENGLISH, PARAPHRASE_HINDI};
use super::{PromptLanguage, WordRange};

/// Generate a prompt for a 50-60 word paraphrased title and summary of one article
pub fn short_summary_prompt(language: PromptLanguage, title: &str, content: &str) -> String {
    let range = WordRange::SHORT;
    match language {
        PromptLanguage::English => format!(
            r#"You are an expert news editor. Based on the provided title and description, craft a compelling new title and a concise {range} word summary in English.

**Instructions:**
{json_only}
4.  The summary must be {range} words and capture the key points of the article.
5.  {paraphrase}
6.  The response must exactly match this format:

{{
  "title": "<A compelling, SEO-friendly title in English>",
  "summary": "<A {range} word summary in English>"
}}

--- Article Details ---
**Title:** {title}
**Description:** {content}
--- JSON Response ---"#,
            range = range,
            json_only = JSON_ONLY_ENGLISH,
            paraphrase = PARAPHRASE_ENGLISH,
            title = title,
            content = content,
        ),
        PromptLanguage::Hindi => format!(
            r#"आप एक विशेषज्ञ समाचार संपादक हैं। आपको दिए गए शीर्षक और विवरण के आधार पर, एक आकर्षक शीर्षक और एक संक्षिप्त, सारगर्भित सारांश हिंदी में तैयार करना है।

**निर्देश:**
{json_only}
4.  सारांश {range} शब्दों के बीच होना चाहिए और मुख्य बिंदुओं को उजागर करना चाहिए।
5.  {paraphrase}
6.  प्रतिक्रिया का प्रारूप बिल्कुल इस तरह होना चाहिए:

{{
  "title": "<एक आकर्षक हिंदी शीर्षक>",
  "summary": "<यहाँ हिंदी में {range} शब्दों का सारांश>"
}}

--- लेख का विवरण ---
**शीर्षक:** {title}
**विवरण:** {content}
--- JSON प्रतिक्रिया ---"#,
            range = range,
            json_only = JSON_ONLY_HINDI,
            paraphrase = PARAPHRASE_HINDI,
            title = title,
            content = content,
        ),
    }
}

/// Generate a prompt for a longer single-article summary with a caller supplied word range
pub fn long_summary_prompt(
    language: PromptLanguage,
    title: &str,
    content: &str,
    range: WordRange,
) -> String {
    match language {
        PromptLanguage::English => format!(
            r#"You are a senior news editor writing for a digital news desk. Read the article below and produce a fresh headline and a complete, well-structured summary in English.

**Instructions:**
{json_only}
4.  The summary must be {range} words long.
5.  Cover who, what, when, where and why, keeping every figure, date and name accurate.
6.  {paraphrase}
7.  Keep a neutral, journalistic tone. Do not add facts that are not in the article.
8.  The response must exactly match this format:

{{
  "title": "<A fresh, engaging headline in English>",
  "summary": "<A {range} word summary in English>"
}}

--- Article ---
**Title:** {title}
**Content:** {content}
--- JSON Response ---"#,
            range = range,
            json_only = JSON_ONLY_ENGLISH,
            paraphrase = PARAPHRASE_ENGLISH,
            title = title,
            content = content,
        ),
        PromptLanguage::Hindi => format!(
            r#"आप एक डिजिटल समाचार डेस्क के वरिष्ठ समाचार संपादक हैं। नीचे दिए गए लेख को पढ़कर एक नया शीर्षक और हिंदी में एक पूर्ण, सुव्यवस्थित सारांश तैयार करें।

**निर्देश:**
{json_only}
4.  सारांश {range} शब्दों का होना चाहिए।
5.  कौन, क्या, कब, कहाँ और क्यों को शामिल करें, और सभी आँकड़े, तिथियाँ और नाम सटीक रखें।
6.  {paraphrase}
7.  निष्पक्ष, पत्रकारीय भाषा रखें। लेख में न दिए गए तथ्य न जोड़ें।
8.  प्रतिक्रिया का प्रारूप बिल्कुल इस तरह होना चाहिए:

{{
  "title": "<एक नया, आकर्षक हिंदी शीर्षक>",
  "summary": "<यहाँ हिंदी में {range} शब्दों का सारांश>"
}}

--- लेख ---
**शीर्षक:** {title}
**सामग्री:** {content}
--- JSON प्रतिक्रिया ---"#,
            range = range,
            json_only = JSON_ONLY_HINDI,
            paraphrase = PARAPHRASE_HINDI,
            title = title,
            content = content,
        ),
    }
}

/// Generate a prompt that merges several labeled articles into one news summary
pub fn consolidated_summary_prompt(
    language: PromptLanguage,
    articles: &str,
    range: WordRange,
) -> String {
    match language {
        PromptLanguage::English => format!(
            r#"You are a news editor preparing a single briefing from several related reports. Read all of the articles below and write one consolidated headline and one consolidated summary in English.

**Instructions:**
{json_only}
4.  The summary must be {range} words long and read as one coherent story, not a list of separate articles.
5.  Merge overlapping facts, keep the most important developments first, and keep names, figures and dates accurate.
6.  {paraphrase}
7.  The response must exactly match this format:

{{
  "title": "<One headline covering all articles, in English>",
  "summary": "<A {range} word consolidated summary in English>"
}}

--- Articles ---
{articles}
--- JSON Response ---"#,
            range = range,
            json_only = JSON_ONLY_ENGLISH,
            paraphrase = PARAPHRASE_ENGLISH,
            articles = articles,
        ),
        PromptLanguage::Hindi => format!(
            r#"आप एक समाचार संपादक हैं जो कई संबंधित रिपोर्टों से एक ही समाचार बुलेटिन तैयार कर रहे हैं। नीचे दिए गए सभी लेख पढ़ें और हिंदी में एक समेकित शीर्षक और एक समेकित सारांश लिखें।

**निर्देश:**
{json_only}
4.  सारांश {range} शब्दों का होना चाहिए और अलग-अलग लेखों की सूची के बजाय एक सुसंगत खबर की तरह पढ़ा जाना चाहिए।
5.  दोहराए गए तथ्यों को मिलाएँ, सबसे महत्वपूर्ण घटनाक्रम पहले रखें, और नाम, आँकड़े व तिथियाँ सटीक रखें।
6.  {paraphrase}
7.  प्रतिक्रिया का प्रारूप बिल्कुल इस तरह होना चाहिए:

{{
  "title": "<सभी लेखों को समेटने वाला एक हिंदी शीर्षक>",
  "summary": "<यहाँ हिंदी में {range} शब्दों का समेकित सारांश>"
}}

--- लेख ---
{articles}
--- JSON प्रतिक्रिया ---"#,
            range = range,
            json_only = JSON_ONLY_HINDI,
            paraphrase = PARAPHRASE_HINDI,
            articles = articles,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consolidated_prompt_embeds_articles() {
        let block = "Article 1: A\nbody a\n\nArticle 2: B\nbody b";
        let prompt = consolidated_summary_prompt(
            PromptLanguage::English,
            block,
            WordRange { min: 180, max: 200 },
        );
        assert!(prompt.contains(block));
        assert!(prompt.contains("180-200"));
        assert!(prompt.contains("verbatim"));
    }

    #[test]
    fn test_hindi_prompts_request_json() {
        for prompt in [
            short_summary_prompt(PromptLanguage::Hindi, "शीर्षक", "विवरण"),
            long_summary_prompt(PromptLanguage::Hindi, "शीर्षक", "विवरण", WordRange::LONG),
            consolidated_summary_prompt(PromptLanguage::Hindi, "Article 1: x", WordRange::CONSOLIDATED),
        ] {
            assert!(prompt.contains("JSON"));
            assert!(prompt.contains("\"title\""));
            assert!(prompt.contains("\"summary\""));
        }
    }
}
