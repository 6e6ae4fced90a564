//! User-facing message texts.
//!
//! The membership audience is Arabic-speaking; everything a member reads in
//! the bot chat or on a claim page lives here so copy changes stay in one
//! place. Log lines stay in English.

/// Button caption for the login link.
pub const BTN_LOGIN: &str = "🚀 الدخول إلى حسابي";
/// Button caption for the signup link.
pub const BTN_SIGNUP: &str = "📝 إنشاء حساب جديد";
/// Button caption for re-issuing a fresh link.
pub const BTN_REFRESH: &str = "🔄 تحديث الرابط";
/// Toast shown while a refresh callback is being processed.
pub const REFRESHING: &str = "جاري تحديث الرابط...";
/// Persistent-keyboard text some clients still send instead of `/start`.
pub const KEYBOARD_START_TEXT: &str = "🚀 الدخول إلى الموقع";

/// Chat-side fallback when link issuance fails.
pub const ACCESS_FAILED: &str = "❌ حدث خطأ. يرجى المحاولة لاحقا.";

/// Claim-side: token missing, consumed, or malformed.
pub const LINK_INVALID: &str = "رابط غير صالح أو منتهي الصلاحية";
/// Claim-side: token past its expiry.
pub const LINK_EXPIRED: &str = "انتهت صلاحية الرابط";
/// Claim-side: login grant already consumed or expired.
pub const GRANT_EXPIRED: &str =
    "انتهت صلاحية الوصلة السابقة. المرجو الرجوع إلى البوت وتحديث الرابط";
/// Claim-side: an account exists but membership data is missing.
pub const ALREADY_REGISTERED: &str =
    "هذا الحساب موجود بالفعل ولكن لم يتم العثور على بيانات العضوية. يرجى التواصل مع المسؤول.";
/// Generic terminal failure.
pub const GENERIC_FAILURE: &str = "حدث خطأ. يرجى المحاولة لاحقا.";

/// Greeting for a recognized member, with the login button below.
pub fn greeting_login(first_name: &str) -> String {
    format!(
        "مرحباً {first_name}! 👋\n\n✅ تم العثور على حسابك\n\nاضغط على الزر أدناه للدخول إلى حسابك بشكل آمن."
    )
}

/// Greeting for a new member, with the signup button below.
pub fn greeting_signup(first_name: &str) -> String {
    format!(
        "مرحباً {first_name}! 👋\n\n📝 مرحباً بك في جمعية الجوار\n\nاضغط على الزر أدناه لإنشاء حسابك وإكمال التسجيل."
    )
}

/// Markdown notification sent to admins after a completed signup.
pub fn admin_signup_notification(name: &str, matricule: Option<i32>, grade: i16) -> String {
    let matricule = matricule.map_or_else(|| "—".to_string(), |m| m.to_string());
    format!(
        "🔔 *تسجيل عضو جديد*\n\n👤 *الاسم:* {name}\n🔢 *رقم العضوية:* {matricule}\n🏅 *الدرجة:* {grade}\n\nيرجى مراجعة طلب الانضمام في لوحة التحكم."
    )
}

/// Bot command menu (`setMyCommands`).
pub fn bot_commands() -> Vec<jiwar_core::models::telegram::BotCommand> {
    use jiwar_core::models::telegram::BotCommand;
    vec![
        BotCommand {
            command: "start".into(),
            description: "🚀 الدخول إلى الموقع / Start".into(),
        },
        BotCommand {
            command: "help".into(),
            description: "❓ المساعدة / Help".into(),
        },
    ]
}
