pub const APP_TITLE: &str = "AI 진로 상담 선생님 🎓";
pub const SHARE_TITLE: &str = "AI 진로 상담 선생님과의 대화";
pub const SHARE_BUTTON_LABEL: &str = "대화 내용 공유하기";
pub const INPUT_PLACEHOLDER: &str = "메시지를 입력하세요...";
pub const SEND_BUTTON_LABEL: &str = "전송";

pub const SYSTEM_INSTRUCTION: &str = "너는 나의 진로를 상담해주는 선생님이야. 나는 대한민국 마산 성지여자고등학교에 다니는 고등학교 2학년 여학생이야. 내가 말하는 모든 맥락을 기억해야해. 친절하고 따뜻한 말투를 사용하고, 항상 이모지를 사용해서 답변을 더 부드럽게 만들어줘.";

pub const GREETING: &str = "안녕하세요, 성지여자고등학교 학생. 만나서 반가워요! 저는 학생의 진로 고민을 함께 나누고 도와줄 진로 상담 선생님이에요. 어떤 이야기든 편하게 들려주세요. 😊";
pub const INIT_ERROR: &str = "오류가 발생했어요. API 키 설정을 확인해주세요. 😥";
pub const SEND_ERROR: &str =
    "메시지를 보내는 중 문제가 발생했어요. 잠시 후 다시 시도해주세요. 😟";
pub const TYPING: &str = "입력 중...";

pub const USER_LABEL: &str = "나";
pub const MODEL_LABEL: &str = "AI 선생님";

pub const NOTHING_TO_SHARE: &str = "공유할 대화 내용이 없습니다.";
pub const COPIED: &str = "대화 내용이 클립보드에 복사되었습니다.";
pub const COPY_FAILED: &str = "복사에 실패했습니다.";
