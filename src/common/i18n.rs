// src/common/i18n.rs

use std::collections::HashMap;

use crate::models::settings::Language;

// Tabela de mensagens por idioma. Chaves são os códigos de erro do AppError
// e os códigos de validação usados nos payloads.
const EN: &[(&str, &str)] = &[
    ("validation_failed", "One or more fields are invalid."),
    ("not_found", "The requested record was not found."),
    ("invalid_transition", "This status change is not allowed."),
    ("reference_conflict", "The record is still referenced by other records."),
    ("unauthenticated", "You must be signed in."),
    ("owner_required", "Only the account owner can perform this action."),
    ("invalid_tenant", "The X-Tenant-ID header is missing or invalid."),
    ("session_expired", "Your session has expired. Please sign in again."),
    ("account_inactive", "Your account is inactive. Contact your administrator."),
    ("invalid_credentials", "Invalid email or password."),
    ("password_mismatch", "Passwords do not match."),
    ("auth_failed", "Authentication failed. Please try again."),
    ("upstream_error", "The CRM server could not complete the request."),
    ("remote_not_configured", "The CRM server is not configured."),
    ("internal_error", "An unexpected error occurred."),
    ("required", "This field is required."),
    ("password_too_short", "The password must have at least 8 characters."),
    ("invalid_email", "The email address is invalid."),
    ("invalid_color", "The color must be a hex value like #1a2b3c."),
    ("invalid_percentage", "The percentage must be between 0 and 100."),
    ("negative_amount", "The value cannot be negative."),
];

const AR: &[(&str, &str)] = &[
    ("validation_failed", "حقل واحد أو أكثر غير صالح."),
    ("not_found", "السجل المطلوب غير موجود."),
    ("invalid_transition", "تغيير الحالة هذا غير مسموح."),
    ("reference_conflict", "السجل لا يزال مرتبطًا بسجلات أخرى."),
    ("unauthenticated", "يجب تسجيل الدخول."),
    ("owner_required", "هذا الإجراء متاح لمالك الحساب فقط."),
    ("invalid_tenant", "الترويسة X-Tenant-ID مفقودة أو غير صالحة."),
    ("session_expired", "انتهت الجلسة. يرجى تسجيل الدخول مرة أخرى."),
    ("account_inactive", "حسابك غير نشط. تواصل مع المسؤول."),
    ("invalid_credentials", "البريد الإلكتروني أو كلمة المرور غير صحيحة."),
    ("password_mismatch", "كلمتا المرور غير متطابقتين."),
    ("auth_failed", "فشلت المصادقة. حاول مرة أخرى."),
    ("upstream_error", "تعذر على خادم CRM إكمال الطلب."),
    ("remote_not_configured", "خادم CRM غير مهيأ."),
    ("internal_error", "حدث خطأ غير متوقع."),
    ("required", "هذا الحقل مطلوب."),
    ("password_too_short", "يجب أن تتكون كلمة المرور من 8 أحرف على الأقل."),
    ("invalid_email", "البريد الإلكتروني غير صالح."),
    ("invalid_color", "يجب أن يكون اللون بصيغة #1a2b3c."),
    ("invalid_percentage", "يجب أن تكون النسبة بين 0 و 100."),
    ("negative_amount", "لا يمكن أن تكون القيمة سالبة."),
];

#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<Language, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut messages = HashMap::new();
        messages.insert(Language::En, EN.iter().copied().collect());
        messages.insert(Language::Ar, AR.iter().copied().collect());
        Self { messages }
    }

    /// Busca a mensagem no idioma pedido, com fallback para inglês e,
    /// por fim, para o próprio código.
    pub fn message(&self, lang: Language, code: &str) -> String {
        self.messages
            .get(&lang)
            .and_then(|table| table.get(code))
            .or_else(|| self.messages.get(&Language::En).and_then(|t| t.get(code)))
            .map(|m| m.to_string())
            .unwrap_or_else(|| code.to_string())
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}
