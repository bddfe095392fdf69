// 型エイリアス
pub type Type = usize; // 牌の種別部分 (萬子,筒子,索子,字牌)
pub type Tnum = usize; // 牌の数字部分 (1~9, 0:赤5 の10種)
pub type Index136 = usize; // 136枚表現での牌のindex (牌種*4 + 同種内の通し番号)

// Number
pub const TYPE: usize = 4; // 牌の種別部分の数 (萬子,筒子,索子,字牌)
pub const TNUM: usize = 10; // 牌の数字部分の数 (1~9, 0:赤5 の10種)
pub const TILE: usize = 4; // 同種の牌の数
pub const HAND: usize = 14; // 和了時の手牌の枚数

// Type Index
pub const TM: usize = 0; // Type: Manzu (萬子)
pub const TP: usize = 1; // Type: Pinzu (筒子)
pub const TS: usize = 2; // Type: Souzu (索子)
pub const TZ: usize = 3; // Type: Zihai (字牌)

// 検出器のclass idとして受け付ける範囲 (コード表より広い, 37~39は対応する牌なし)
pub const CLASS_ID_LIMIT: i64 = 40;

// 信頼度の閾値 (手牌は引数で変更可能, ドラ表示牌は固定)
pub const DEFAULT_THRESHOLD: f64 = 0.5;
pub const DORA_THRESHOLD: f64 = 0.5;
