//! Canned reply texts for the rule-based policy.
//!
//! Plain text only: line breaks separate paragraphs and "•" marks list items.

use crate::models::SymptomTag;

pub const CONFIRMATION: &str = "太好了，很高興您今天感覺不錯！😊

簡單確認一下：
• 呼吸還順暢嗎？
• 傷口有沒有不舒服？
• 活動和食慾都還可以嗎？

如果都沒問題，今天的回報就完成囉！";

pub const CLOSING: &str = "✅ 今日症狀回報完成！

感謝您的回報，我們會持續關心您的狀況。

明天見！祝您有美好的一天 🌟";

pub const OPEN_PROMPT: &str = "謝謝您的回覆。

能否描述一下您的感受呢？例如：
• 有沒有哪裡不舒服？
• 呼吸順暢嗎？
• 傷口疼痛如何？

或直接點選上方的快速回覆按鈕。";

/// Marker line present in every severe-tier reply.
pub const ESCALATION_NOTICE: &str = "⚠️ 我已經通知個案管理師，她會盡快與您聯繫。";

/// Clarifying question for a reported symptom, asking for a 0-10 rating.
///
/// Only the four symptoms the dialogue follows up on have a question.
pub fn symptom_follow_up(tag: SymptomTag) -> Option<&'static str> {
    match tag {
        SymptomTag::RespiratoryDistress => Some(
            "了解，呼吸有些不順的感覺。

請問用 0 到 10 分來評估，0 分是完全不喘，10 分是非常喘，您覺得大概幾分呢？",
        ),
        SymptomTag::Pain => Some(
            "了解您有疼痛的感覺。

請問：
• 疼痛的位置在哪裡呢？
• 用 0-10 分評估，大概幾分？",
        ),
        SymptomTag::Cough => Some(
            "好的，關於咳嗽的問題。

請問：
• 是乾咳還是有痰呢？
• 咳嗽嚴重程度 0-10 分大概幾分？",
        ),
        SymptomTag::Fatigue => Some(
            "謝謝您告訴我。疲勞是術後常見的症狀。

請問這個疲勞感用 0-10 分評估，大概幾分呢？",
        ),
        SymptomTag::SleepIssue | SymptomTag::AppetiteLoss => None,
    }
}

pub fn severe_guidance(score: u8) -> String {
    format!(
        "收到，{score} 分是比較嚴重的狀況。

{ESCALATION_NOTICE}

在等待的時候：
• 請找個舒適的姿勢休息
• 如果是喘，試試噘嘴式呼吸
• 若有加重，請撥打緊急電話

請問還有其他不舒服嗎？"
    )
}

pub fn moderate_guidance(score: u8) -> String {
    format!(
        "收到，{score} 分屬於中度不適。

💡 建議您：
• 噘嘴式呼吸：鼻吸 2 秒，噘嘴吐 4 秒
• 找舒適姿勢休息
• 適度活動

個管師會關心您的狀況。還有其他不舒服嗎？"
    )
}

pub fn mild_guidance(score: u8) -> String {
    format!(
        "收到，{score} 分是輕微的程度！

✅ 已記錄

繼續保持：
• 按時服藥
• 適度活動
• 充足休息

還有其他想回報的嗎？"
    )
}

/// Opening message of a new session.
pub fn greeting(patient_name: &str, post_op_day: i64) -> String {
    let name = if patient_name.trim().is_empty() {
        "您"
    } else {
        patient_name
    };
    format!(
        "您好，{name}！我是您的健康小助手 🌱

今天是您術後第 {post_op_day} 天，感覺怎麼樣呢？

您可以直接告訴我，或點選下方的快速回覆按鈕。"
    )
}

/// Text submitted on the patient's behalf by the score slider.
pub fn direct_score_text(score: u8) -> String {
    format!("我的整體不適程度是 {score} 分")
}

/// A quick-reply button: label shown, text sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct QuickReply {
    pub label: &'static str,
    pub text: &'static str,
}

pub const QUICK_REPLIES: &[QuickReply] = &[
    QuickReply { label: "😊 還不錯", text: "今天感覺還不錯" },
    QuickReply { label: "😓 有點累", text: "今天覺得有點累" },
    QuickReply { label: "😮‍💨 有點喘", text: "呼吸有點喘" },
    QuickReply { label: "😣 有點痛", text: "有點痛" },
    QuickReply { label: "✅ 都沒事", text: "都沒有不舒服，今天狀況很好" },
    QuickReply { label: "🏁 完成回報", text: "沒有其他要回報的了" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_up_exists_for_tracked_symptoms() {
        for tag in [
            SymptomTag::RespiratoryDistress,
            SymptomTag::Pain,
            SymptomTag::Cough,
            SymptomTag::Fatigue,
        ] {
            let text = symptom_follow_up(tag).unwrap();
            assert!(text.contains("10"), "{tag} question must ask for a 0-10 rating");
        }
        assert!(symptom_follow_up(SymptomTag::SleepIssue).is_none());
    }

    #[test]
    fn severe_guidance_carries_escalation_notice() {
        let text = severe_guidance(8);
        assert!(text.contains("8 分"));
        assert!(text.contains(ESCALATION_NOTICE));
        assert!(!moderate_guidance(5).contains(ESCALATION_NOTICE));
    }

    #[test]
    fn greeting_mentions_day_and_name() {
        let text = greeting("王大明", 3);
        assert!(text.contains("王大明"));
        assert!(text.contains("術後第 3 天"));
        assert!(greeting("  ", 0).starts_with("您好，您！"));
    }

    #[test]
    fn direct_score_text_embeds_score() {
        assert_eq!(direct_score_text(6), "我的整體不適程度是 6 分");
    }
}
